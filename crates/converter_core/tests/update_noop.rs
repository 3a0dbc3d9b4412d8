use converter_core::{update, AppState, Msg};
use url::Url;

#[test]
fn update_is_noop() {
    let state = AppState::new(Url::parse("http://127.0.0.1:8000").unwrap());
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
