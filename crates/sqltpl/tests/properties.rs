use proptest::prelude::*;
use sqltpl::{Arg, TypeTag, build_query, format_value, skip};

fn arb_scalar() -> impl Strategy<Value = Arg> {
    prop_oneof![
        Just(Arg::Null),
        any::<bool>().prop_map(Arg::Bool),
        any::<i64>().prop_map(Arg::Int),
        any::<f64>().prop_map(Arg::Float),
        // No braces: those would form blocks after expansion.
        "[a-zA-Z0-9_ ?=#.-]{0,8}".prop_map(Arg::Text),
    ]
}

fn arb_arg() -> impl Strategy<Value = Arg> {
    arb_scalar().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Arg::List),
            prop::collection::vec(("[a-z_]{1,6}", inner), 0..4).prop_map(Arg::Map),
        ]
    })
}

fn generic_join(items: &[Arg]) -> String {
    items
        .iter()
        .map(|item| format_value(TypeTag::Generic, item))
        .collect::<Vec<_>>()
        .join(", ")
}

proptest! {
    #[test]
    fn array_of_list_is_join_of_generic_elements(
        items in prop::collection::vec(arb_arg(), 0..6),
    ) {
        let sql = build_query("?a", &[Arg::List(items.clone())]).unwrap();
        prop_assert_eq!(sql, generic_join(&items));
    }

    #[test]
    fn substituted_values_are_not_rescanned(value in arb_arg()) {
        let sql = build_query("x = ?", &[value.clone()]).unwrap();
        prop_assert_eq!(sql, format!("x = {}", format_value(TypeTag::Generic, &value)));
    }

    #[test]
    fn text_without_placeholders_or_braces_is_unchanged(text in "[a-zA-Z0-9_ ,.=*()']{1,40}") {
        prop_assert_eq!(build_query(&text, &[]).unwrap(), text);
    }

    #[test]
    fn skipped_block_is_dropped_whatever_precedes_it(prefix in "[a-zA-Z0-9_ ,.=*()']{0,20}") {
        let template = format!("{prefix}{{ AND flag = ?d}}");
        prop_assert_eq!(build_query(&template, &[skip()]).unwrap(), prefix);
    }
}
