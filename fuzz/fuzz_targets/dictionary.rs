#![no_main]
use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use std::collections::HashSet;
use yesno::Config;

#[derive(Arbitrary, Clone, Debug)]
enum Op {
    Insert(Vec<u8>),
    Remove(Vec<u8>),
    Contains(Vec<u8>),
    Clear,
}

// Small alphabet, so ops actually hit the same keys
fn shrink(key: &[u8]) -> Vec<u8> {
    key.iter().take(4).map(|b| b % 4).collect()
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);

    let capacity_hint = usize::from(u8::arbitrary(&mut unstructured).unwrap_or(1)).max(1);
    let load_factor = f32::from(u8::arbitrary(&mut unstructured).unwrap_or(0)) / 255.0;

    let Ok(ops) = <Vec<Op> as Arbitrary>::arbitrary(&mut unstructured) else {
        return;
    };

    let mut dict = Config::new()
        .capacity_hint(capacity_hint)
        .max_load_factor(load_factor)
        .create()
        .unwrap();

    let mut model = HashSet::<Vec<u8>>::new();

    for op in ops {
        match op {
            Op::Insert(key) => {
                let key = shrink(&key);
                let inserted = dict.insert(&key).unwrap();
                let expected = !key.is_empty() && model.insert(key);
                assert_eq!(expected, inserted);
            }
            Op::Remove(key) => {
                let key = shrink(&key);
                assert_eq!(model.remove(&key), dict.remove(&key));
            }
            Op::Contains(key) => {
                let key = shrink(&key);
                assert_eq!(model.contains(&key), dict.contains(&key));
            }
            Op::Clear => {
                model.clear();
                dict.clear();
            }
        }

        assert_eq!(model.len(), dict.len());
        assert!(dict.len() < dict.capacity());
    }

    for key in &model {
        assert!(dict.contains(key));
    }
});
