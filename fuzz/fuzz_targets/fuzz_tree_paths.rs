#![no_main]

use libfuzzer_sys::fuzz_target;
use szamla::core::AttributeTree;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let mut tree = AttributeTree::new();
    for path in s.lines() {
        tree.set(path, path);
        if !path.is_empty() {
            assert_eq!(tree.get(path).and_then(|v| v.as_str()), Some(path));
        }
        let _ = tree.remove(path);
    }
});
