use crate::domain::action::DialogStage;
use crate::domain::cards::PlayerId;
use crate::domain::rules::identify_dialog_audience;
use crate::errors::EngineError;

fn roster(n: usize) -> Vec<PlayerId> {
    (0..n).map(|_| PlayerId::fresh()).collect()
}

#[test]
fn selection_stages_address_only_the_caller() {
    let players = roster(4);
    let caller = players[1];
    for stage in [
        DialogStage::PlayerSelection,
        DialogStage::PropertySetSelection,
        DialogStage::TableHandSelection,
        DialogStage::OwnHandSelection,
        DialogStage::WildcardColorSelection,
    ] {
        let audience =
            identify_dialog_audience(caller, Some(players[2]), &players, stage).unwrap();
        assert_eq!(audience, vec![caller], "stage {stage:?}");
    }
}

#[test]
fn pay_value_addresses_explicit_target() {
    let players = roster(4);
    let audience = identify_dialog_audience(
        players[0],
        Some(players[3]),
        &players,
        DialogStage::PayValue,
    )
    .unwrap();
    assert_eq!(audience, vec![players[3]]);
}

#[test]
fn pay_value_without_target_addresses_everyone_else() {
    let players = roster(4);
    let audience =
        identify_dialog_audience(players[1], None, &players, DialogStage::PayValue).unwrap();
    assert_eq!(audience.len(), 3);
    assert!(!audience.contains(&players[1]));
    for p in [players[0], players[2], players[3]] {
        assert!(audience.contains(&p));
    }
}

#[test]
fn shields_up_addresses_only_the_defender() {
    let players = roster(3);
    let audience = identify_dialog_audience(
        players[0],
        Some(players[2]),
        &players,
        DialogStage::ShieldsUp,
    )
    .unwrap();
    assert_eq!(audience, vec![players[2]]);
}

#[test]
fn shields_up_without_defender_is_a_programming_error() {
    let players = roster(3);
    let err = identify_dialog_audience(players[0], None, &players, DialogStage::ShieldsUp)
        .unwrap_err();
    assert!(matches!(err, EngineError::Invariant(_)));
}
