use parley_nl::intents::standard_table;
use parley_nl::{Intent, Resolution, Resolver};
use proptest::prelude::*;

const RESERVED: &[&str] = &["to", "file", "directory", "folder"];

/// Verbs of patterns registered ahead of `move`; a name containing one would
/// be picked up by that earlier pattern.
const EARLIER_VERBS: &[&str] = &["cat", "read", "display", "print", "delete", "remove"];

fn name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_][A-Za-z0-9_.-]{0,11}")
        .unwrap()
        .prop_filter("reserved word", |s| !RESERVED.contains(&s.to_ascii_lowercase().as_str()))
}

fn plain_name() -> impl Strategy<Value = String> {
    name().prop_filter("earlier verb", |s| {
        let lower = s.to_ascii_lowercase();
        !EARLIER_VERBS.iter().any(|v| lower.contains(v))
    })
}

fn resolver() -> Resolver<Intent> {
    Resolver::new(standard_table().expect("standard table compiles"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn any_text_resolves_without_panicking(text in "\\PC{0,64}") {
        let r = resolver();
        match r.resolve(&text) {
            Resolution::NeedInput => prop_assert!(text.trim().is_empty()),
            Resolution::NotUnderstood(echo) => {
                prop_assert_eq!(echo.as_str(), text.trim());
                prop_assert!(parley_nl::engine::not_understood(&echo).contains(&echo));
            }
            Resolution::Matched(hit) => {
                let arity = r.table().patterns()[hit.index].arity();
                prop_assert_eq!(hit.slots.len(), arity);
            }
            Resolution::Examples => {}
        }
    }

    #[test]
    fn folder_names_are_extracted(dir in name(), second in proptest::option::of(name())) {
        let full = match &second {
            Some(more) => format!("{dir} {more}"),
            None => dir.clone(),
        };
        let r = resolver();
        match r.resolve(&format!("create a new folder called {full}")) {
            Resolution::Matched(hit) => {
                prop_assert_eq!(*hit.handler, Intent::CreateDirectory);
                prop_assert_eq!(hit.slots, vec![full]);
            }
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    #[test]
    fn move_splits_at_the_word_to(source in plain_name(), destination in plain_name()) {
        let r = resolver();
        match r.resolve(&format!("move file {source} to {destination}")) {
            Resolution::Matched(hit) => {
                prop_assert_eq!(*hit.handler, Intent::Move);
                prop_assert_eq!(hit.slots, vec![source, destination]);
            }
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }
}
