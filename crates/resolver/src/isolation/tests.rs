use std::cell::RefCell;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use super::*;

const UP: Option<&str> = Some("upstream");
const LOCAL: Option<&str> = Some("local");

#[rstest]
#[case(IsolationLevel::None, None, None, None, false)]
#[case(IsolationLevel::None, None, LOCAL, LOCAL, false)]
#[case(IsolationLevel::None, UP, None, UP, false)]
#[case(IsolationLevel::None, UP, LOCAL, LOCAL, false)]
#[case(IsolationLevel::Transitional, None, None, None, false)]
#[case(IsolationLevel::Transitional, None, LOCAL, LOCAL, false)]
#[case(IsolationLevel::Transitional, UP, None, UP, true)]
#[case(IsolationLevel::Transitional, UP, LOCAL, LOCAL, false)]
#[case(IsolationLevel::Full, None, None, None, false)]
#[case(IsolationLevel::Full, None, LOCAL, LOCAL, false)]
#[case(IsolationLevel::Full, UP, None, None, false)]
#[case(IsolationLevel::Full, UP, LOCAL, LOCAL, false)]
fn test_choose_truth_table(
	#[case] level: IsolationLevel,
	#[case] upstream: Option<&str>,
	#[case] local: Option<&str>,
	#[case] expected: Option<&str>,
	#[case] advised: bool,
) {
	let calls = RefCell::new(Vec::new());
	let chosen = level.choose(upstream, local, |u| calls.borrow_mut().push(*u));
	assert_eq!(chosen, expected);
	assert_eq!(!calls.borrow().is_empty(), advised);
	if advised {
		assert_eq!(*calls.borrow(), vec!["upstream"]);
	}
}

#[test]
fn test_choose_list_merges_local_first() {
	let upstream = vec!["a1", "a2"];
	let local = vec!["b"];
	for level in [IsolationLevel::None, IsolationLevel::Transitional] {
		assert_eq!(level.choose_list(upstream.clone(), local.clone(), |_| {}), vec!["b", "a1", "a2"]);
	}
	assert_eq!(IsolationLevel::Full.choose_list(upstream, local, |_| {}), vec!["b"]);
}

#[test]
fn test_choose_list_deduplicates_merge() {
	let merged = IsolationLevel::None.choose_list(vec!["x", "a", "x"], vec!["b", "x"], |_| {});
	assert_eq!(merged, vec!["b", "x", "a"]);
}

#[test]
fn test_choose_list_single_side_unchanged() {
	// One-sided results are passed through as-is, duplicates included.
	assert_eq!(IsolationLevel::None.choose_list(vec!["a", "a"], vec![], |_| {}), vec!["a", "a"]);
	assert_eq!(IsolationLevel::Full.choose_list(vec![], vec!["b", "b"], |_| {}), vec!["b", "b"]);
	assert!(IsolationLevel::Full.choose_list(vec!["a"], vec![], |_| {}).is_empty());
	assert!(IsolationLevel::None.choose_list(Vec::<&str>::new(), vec![], |_| {}).is_empty());
}

#[test]
fn test_choose_list_transitional_advises_upstream() {
	let advised = RefCell::new(Vec::new());
	let record = |u: &[&'static str]| advised.borrow_mut().push(u.to_vec());

	IsolationLevel::Transitional.choose_list(vec!["a"], vec![], record);
	IsolationLevel::Transitional.choose_list(vec!["c"], vec!["b"], record);
	IsolationLevel::Transitional.choose_list(vec![], vec!["b"], record);
	IsolationLevel::None.choose_list(vec!["d"], vec![], record);
	IsolationLevel::Full.choose_list(vec!["e"], vec![], record);

	assert_eq!(*advised.borrow(), vec![vec!["a"], vec!["c"]]);
}

#[test]
fn test_deserialize_level() {
	#[derive(Deserialize)]
	struct Wrapper {
		level: IsolationLevel,
	}

	let w: Wrapper = toml::from_str(r#"level = "transitional""#).unwrap();
	assert_eq!(w.level, IsolationLevel::Transitional);
	assert_eq!(IsolationLevel::default(), IsolationLevel::None);
	assert_eq!(IsolationLevel::Full.to_string(), "full");
}

fn level() -> impl Strategy<Value = IsolationLevel> {
	prop_oneof![
		Just(IsolationLevel::None),
		Just(IsolationLevel::Transitional),
		Just(IsolationLevel::Full),
	]
}

proptest! {
	#[test]
	fn full_never_returns_upstream_only(up in any::<Option<u8>>()) {
		prop_assert_eq!(IsolationLevel::Full.choose(up, None, |_| {}), None);
	}

	#[test]
	fn local_always_wins(level in level(), up in any::<Option<u8>>(), local in any::<u8>()) {
		prop_assert_eq!(level.choose(up, Some(local), |_| {}), Some(local));
	}

	#[test]
	fn none_and_transitional_agree(up in any::<Option<u8>>(), local in any::<Option<u8>>()) {
		prop_assert_eq!(
			IsolationLevel::None.choose(up, local, |_| {}),
			IsolationLevel::Transitional.choose(up, local, |_| {}),
		);
	}

	#[test]
	fn list_levels_agree_outside_full(
		up in proptest::collection::vec(0u8..8, 0..6),
		local in proptest::collection::vec(0u8..8, 0..6),
	) {
		prop_assert_eq!(
			IsolationLevel::None.choose_list(up.clone(), local.clone(), |_| {}),
			IsolationLevel::Transitional.choose_list(up, local, |_| {}),
		);
	}
}
