#![no_main]

use std::path::{Component, Path};

use drip::source::LocalFileSystem;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|name: &str| {
    let fs = LocalFileSystem::new("/srv/templates");
    if let Ok(path) = fs.full_path(name) {
        assert!(path.starts_with(Path::new("/srv/templates")));
        assert!(!path.components().any(|c| c == Component::ParentDir));
    }
});
