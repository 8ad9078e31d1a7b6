// tests/command_properties.rs

use gir::exec::{ProcessCommand, Token};
use proptest::prelude::*;

fn token_strategy() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[a-z0-9_./-]{1,12}")
}

proptest! {
    #[test]
    fn assembly_keeps_present_tokens_in_order(tokens in proptest::collection::vec(token_strategy(), 0..16)) {
        let expected: Vec<String> = tokens.iter().flatten().cloned().collect();
        let command = ProcessCommand::from_tokens(tokens.iter().cloned().map(Token::from));
        prop_assert_eq!(command.argv(), expected.as_slice());
    }

    #[test]
    fn appending_in_two_steps_matches_one_step(
        head in proptest::collection::vec(token_strategy(), 0..8),
        tail in proptest::collection::vec(token_strategy(), 0..8),
    ) {
        let mut stepwise = ProcessCommand::from_tokens(head.clone());
        stepwise.args(tail.clone());

        let all: Vec<Option<String>> = head.into_iter().chain(tail).collect();
        prop_assert_eq!(stepwise, ProcessCommand::from_tokens(all));
    }
}
