//! Built-in "pay a penalty" journey used when no definition file is given.
//!
//! Links follow the service's controllers: sign-out leads to start, start to
//! the reference-prefix question, and enter-details to the penalty list.
//! None of its steps are conditional and none declare a back link.

use wayfinder_journey::{JourneyDefinition, StepDefinition, StepId};

fn step(id: &str, template: &str, next: Option<&str>) -> StepDefinition {
    StepDefinition {
        id: StepId::from(id),
        templates: vec![template.to_string()],
        next: next.map(StepId::from),
        previous: None,
        guard: None,
    }
}

pub fn pay_penalty() -> JourneyDefinition {
    JourneyDefinition {
        name: "pay-penalty".to_string(),
        steps: vec![
            step("sign-out", "/pay-penalty/sign-out", Some("start")),
            step("start", "/pay-penalty", Some("ref-starts-with")),
            step("ref-starts-with", "/pay-penalty/ref-starts-with", None),
            step(
                "enter-details",
                "/pay-penalty/enter-details",
                Some("view-penalties"),
            ),
            step(
                "view-penalties",
                "/pay-penalty/company/{companyNumber}/penalty/{penaltyRef}/view-penalties",
                None,
            ),
        ],
    }
}
