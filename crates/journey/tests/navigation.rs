//! End-to-end navigation behaviour over small hand-built journeys.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use proptest::prelude::*;
use wayfinder_journey::{
    ConfigurationError, Direction, GuardTable, JourneyDefinition, JourneyNavigator,
    NavigationError, ResolveError, StepDescriptor, StepId, StepRegistry,
};

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn step(id: &str, template: &str) -> StepDescriptor {
    StepDescriptor::new(id).template(template).unwrap()
}

fn journey(steps: Vec<StepDescriptor>, guards: GuardTable) -> JourneyNavigator {
    let registry = StepRegistry::builder().steps(steps).build().unwrap();
    JourneyNavigator::new(Arc::new(registry), Arc::new(guards))
}

fn counting(calls: &Arc<AtomicUsize>, result: bool) -> impl Fn(&[String]) -> anyhow::Result<bool> {
    let calls = calls.clone();
    move |_: &[String]| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(result)
    }
}

/// s1 -> s2 (conditional) -> s3 (conditional) -> s4, linked both ways.
fn skip_chain(guards: GuardTable) -> JourneyNavigator {
    journey(
        vec![
            step("s1", "/s1/{a}").next("s2"),
            step("s2", "/s2/{a}").previous("s1").next("s3").conditional(),
            step("s3", "/s3/{a}").previous("s2").next("s4").conditional(),
            step("s4", "/s4/{a}").previous("s3"),
        ],
        guards,
    )
}

fn hide_s2_show_s3() -> GuardTable {
    GuardTable::new()
        .register_fn("s2", |_: &[String]| Ok(false))
        .register_fn("s3", |_: &[String]| Ok(true))
}

#[test]
fn example_from_step_a_to_step_b() {
    let navigator = journey(
        vec![step("step-a", "/a").next("step-b"), step("step-b", "/b/{x}/{y}")],
        GuardTable::new(),
    );

    assert_eq!(
        navigator
            .resolve_next(&"step-a".into(), &args(&["12345678", "A1234567"]))
            .unwrap(),
        "/b/12345678/A1234567"
    );

    let err = navigator
        .resolve_next(&"step-a".into(), &args(&["12345678"]))
        .unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Navigation(NavigationError::NoMatchingMapping { .. })
    ));
    assert_eq!(
        err.to_string(),
        "No mapping found that matches the number of path variables provided"
    );
}

#[test]
fn hidden_step_is_never_returned() {
    let navigator = skip_chain(hide_s2_show_s3());

    let resolution = navigator
        .resolve(&"s1".into(), Direction::Next, &args(&["x"]))
        .unwrap();
    assert_eq!(resolution.path, "/s3/x");
    assert_eq!(resolution.step, StepId::from("s3"));
    assert_eq!(resolution.skipped, vec![StepId::from("s2")]);
}

#[test]
fn repeated_resolution_is_identical() {
    let navigator = skip_chain(hide_s2_show_s3());
    let a = args(&["x"]);

    let first = navigator.resolve(&"s1".into(), Direction::Next, &a).unwrap();
    for _ in 0..5 {
        let again = navigator.resolve(&"s1".into(), Direction::Next, &a).unwrap();
        assert_eq!(again, first);
    }
}

#[test]
fn unconditional_chain_never_invokes_guards() {
    let calls = Arc::new(AtomicUsize::new(0));
    let guards = GuardTable::new()
        .register_fn("s2", counting(&calls, false))
        .register_fn("s3", counting(&calls, false));
    let navigator = journey(
        vec![
            step("s1", "/s1").next("s2"),
            step("s2", "/s2").next("s3"),
            step("s3", "/s3"),
        ],
        guards,
    );

    assert_eq!(navigator.resolve_next(&"s1".into(), &[]).unwrap(), "/s2");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn guard_failure_on_skipped_candidate_aborts() {
    let later = Arc::new(AtomicUsize::new(0));
    let navigator = skip_chain(
        GuardTable::new()
            .register_fn("s2", |_: &[String]| {
                Err(anyhow::anyhow!("feature flag service down"))
            })
            .register_fn("s3", counting(&later, true)),
    );

    let err = navigator
        .resolve_next(&"s1".into(), &args(&["x"]))
        .unwrap_err();
    match err {
        ResolveError::Navigation(NavigationError::Guard { step, source }) => {
            assert_eq!(step, StepId::from("s2"));
            assert_eq!(source.to_string(), "feature flag service down");
        }
        other => panic!("Expected guard failure, got {:?}", other),
    }
    assert_eq!(later.load(Ordering::SeqCst), 0);
}

#[test]
fn forward_and_backward_are_symmetric() {
    let navigator = skip_chain(
        GuardTable::new()
            .register_fn("s2", |_: &[String]| Ok(true))
            .register_fn("s3", |_: &[String]| Ok(true)),
    );
    let a = args(&["x"]);

    let forward = navigator.resolve(&"s1".into(), Direction::Next, &a).unwrap();
    assert_eq!(forward.step, StepId::from("s2"));
    let back = navigator
        .resolve(&forward.step, Direction::Previous, &a)
        .unwrap();
    assert_eq!(back.step, StepId::from("s1"));
    assert_eq!(back.path, "/s1/x");
}

#[test]
fn backward_skips_hidden_steps_too() {
    let navigator = skip_chain(
        GuardTable::new()
            .register_fn("s2", |_: &[String]| Ok(false))
            .register_fn("s3", |_: &[String]| Ok(false)),
    );
    let a = args(&["x"]);

    let forward = navigator.resolve(&"s1".into(), Direction::Next, &a).unwrap();
    assert_eq!(forward.path, "/s4/x");
    assert_eq!(forward.skipped.len(), 2);

    let back = navigator
        .resolve(&forward.step, Direction::Previous, &a)
        .unwrap();
    assert_eq!(back.path, "/s1/x");
}

#[test]
fn skipping_past_the_last_step_is_a_configuration_error() {
    let navigator = journey(
        vec![step("s1", "/s1").next("s2"), step("s2", "/s2").conditional()],
        GuardTable::new().register_fn("s2", |_: &[String]| Ok(false)),
    );

    let err = navigator.resolve_next(&"s1".into(), &[]).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Configuration(ConfigurationError::MissingLink {
            direction: Direction::Next,
            ..
        })
    ));
}

#[test]
fn cycle_of_hidden_steps_is_detected() {
    let guards = GuardTable::new()
        .register_fn("a", |_: &[String]| Ok(false))
        .register_fn("b", |_: &[String]| Ok(false));
    let navigator = journey(
        vec![
            step("start", "/start").next("a"),
            step("a", "/a").next("b").conditional(),
            step("b", "/b").next("a").conditional(),
        ],
        guards,
    );

    let err = navigator.resolve_next(&"start".into(), &[]).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Configuration(ConfigurationError::Cycle { .. })
    ));
}

#[test]
fn step_with_several_mappings_uses_matching_arity() {
    let penalty = step("penalty", "/company/{companyNumber}")
        .template("/company/{companyNumber}/penalty/{penaltyRef}")
        .unwrap();
    let navigator = journey(
        vec![step("start", "/start").next("penalty"), penalty],
        GuardTable::new(),
    );

    assert_eq!(
        navigator
            .resolve_next(&"start".into(), &args(&["1"]))
            .unwrap(),
        "/company/1"
    );
    assert_eq!(
        navigator
            .resolve_next(&"start".into(), &args(&["1", "P2"]))
            .unwrap(),
        "/company/1/penalty/P2"
    );
}

#[test]
fn navigator_is_shareable_across_threads() {
    let navigator = skip_chain(hide_s2_show_s3());

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let navigator = &navigator;
                scope.spawn(move || {
                    let value = format!("company-{i}");
                    navigator
                        .resolve_next(&"s1".into(), &[value.clone()])
                        .map(|path| (path, value))
                })
            })
            .collect();
        for handle in handles {
            let (path, value) = handle.join().unwrap().unwrap();
            assert_eq!(path, format!("/s3/{value}"));
        }
    });
}

#[test]
fn journey_loaded_from_definition() {
    let raw = r#"
        name = "guarded-example"

        [[steps]]
        id = "enter-details"
        template = "/pay-penalty/enter-details"
        next = "penalty-in-dca"

        [[steps]]
        id = "penalty-in-dca"
        template = "/company/{companyNumber}/penalty/{penaltyRef}/penalty-in-dca"
        previous = "enter-details"
        next = "view-penalties"
        guard = "penalty_in_dca"

        [[steps]]
        id = "view-penalties"
        template = "/company/{companyNumber}/penalty/{penaltyRef}/view-penalties"
        previous = "penalty-in-dca"
    "#;
    let definition = JourneyDefinition::from_toml(raw).unwrap();
    let registry = StepRegistry::from_definition(&definition).unwrap();
    assert!(registry.validate().is_ok());

    let guards = GuardTable::new().register_fn("penalty-in-dca", |_: &[String]| Ok(false));
    let navigator = JourneyNavigator::new(Arc::new(registry), Arc::new(guards));
    let a = args(&["12345678", "A1234567"]);

    assert_eq!(
        navigator
            .next_redirect(&"enter-details".into(), &a)
            .unwrap(),
        "redirect:/company/12345678/penalty/A1234567/view-penalties"
    );
    assert_eq!(
        navigator
            .resolve_previous(&"view-penalties".into(), &[])
            .unwrap(),
        "/pay-penalty/enter-details"
    );
}

proptest! {
    #[test]
    fn arity_must_match_exactly(declared in 0usize..6, provided in 0usize..8) {
        let template: String = (0..declared).map(|i| format!("/seg/{{v{i}}}")).collect();
        let template = if template.is_empty() {
            "/none".to_string()
        } else {
            template
        };
        let navigator = journey(
            vec![step("from", "/from").next("to"), step("to", &template)],
            GuardTable::new(),
        );
        let values: Vec<String> = (0..provided).map(|i| format!("value{i}")).collect();

        let result = navigator.resolve_next(&"from".into(), &values);
        if declared == provided {
            let path = result.unwrap();
            for value in &values {
                prop_assert!(path.contains(value.as_str()));
            }
        } else {
            let is_arity_error = matches!(
                result,
                Err(ResolveError::Navigation(NavigationError::NoMatchingMapping { .. }))
            );
            prop_assert!(is_arity_error);
        }
    }
}
