pub mod scenario;
pub mod session;
pub mod validate;

#[cfg(test)]
pub(crate) fn sample_set() -> scenario::ScenarioSet {
    serde_json::from_str(include_str!("../tests/data/scenario_set.json")).unwrap()
}
