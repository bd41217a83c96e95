/// Where a signed-in user may go given their onboarding state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingGate {
    /// Onboarded and outside the onboarding step, or mid-onboarding on it
    Proceed,
    /// Not onboarded yet; must finish onboarding first
    RequireOnboarding,
    /// Already onboarded; the onboarding step no longer applies
    LeaveOnboarding,
}

impl OnboardingGate {
    pub fn evaluate(onboarded: bool, on_onboarding_step: bool) -> Self {
        match (onboarded, on_onboarding_step) {
            (false, false) => OnboardingGate::RequireOnboarding,
            (true, true) => OnboardingGate::LeaveOnboarding,
            _ => OnboardingGate::Proceed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate() {
        assert_eq!(OnboardingGate::evaluate(false, false), OnboardingGate::RequireOnboarding);
        assert_eq!(OnboardingGate::evaluate(false, true), OnboardingGate::Proceed);
        assert_eq!(OnboardingGate::evaluate(true, false), OnboardingGate::Proceed);
        assert_eq!(OnboardingGate::evaluate(true, true), OnboardingGate::LeaveOnboarding);
    }
}
