use super::model::{Compartment, NodeState};

pub const SUSCEPTIBLE_COLOR: &str = "#1f77b4";
pub const INFECTED_COLOR: &str = "#d62728";
pub const RECOVERED_COLOR: &str = "#2ca02c";
pub const DECEASED_COLOR: &str = "#3a3a3a";
/// Used for any state outside the four compartments.
pub const FALLBACK_COLOR: &str = "#7f7f7f";

pub fn compartment_color(compartment: Compartment) -> &'static str {
	match compartment {
		Compartment::Susceptible => SUSCEPTIBLE_COLOR,
		Compartment::Infected => INFECTED_COLOR,
		Compartment::Recovered => RECOVERED_COLOR,
		Compartment::Deceased => DECEASED_COLOR,
	}
}

pub fn state_color(state: &NodeState) -> &'static str {
	match state {
		NodeState::Known(c) => compartment_color(*c),
		NodeState::Unrecognized(_) => FALLBACK_COLOR,
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	#[test]
	fn compartments_have_distinct_colors() {
		let colors: HashSet<_> = Compartment::ALL.into_iter().map(compartment_color).collect();
		assert_eq!(colors.len(), 4);
		assert!(!colors.contains(FALLBACK_COLOR));
	}

	#[test]
	fn unknown_state_falls_back() {
		assert_eq!(state_color(&NodeState::Unrecognized("7".into())), FALLBACK_COLOR);
		assert_eq!(state_color(&Compartment::Infected.into()), INFECTED_COLOR);
	}
}
