#![no_main]

use std::path::{Component, Path};

use arbitrary::Arbitrary;
use drip::context::Registers;
use drip::source::{LocalFileSystem, ScopedFileSystem};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    name: &'a str,
    default_dir: Option<&'a str>,
}

fuzz_target!(|input: Input<'_>| {
    let fs = ScopedFileSystem::new(LocalFileSystem::new("/srv/templates"));
    let mut registers = Registers::new();
    if let Some(dir) = input.default_dir {
        registers.set_default_dir(dir);
    }
    if let Ok(path) = fs.full_path(input.name, &registers) {
        assert!(path.starts_with(Path::new("/srv/templates")));
        assert!(!path.components().any(|c| c == Component::ParentDir));
    }
});
