/// The irreversibility guard on flow deletion: an explicit acknowledgment
/// plus the flow's name typed back exactly (case-sensitive, input trimmed).
/// The delete request is not issued while the gate is closed; there is no
/// network path around it.
#[derive(Clone, Debug, Default)]
pub struct ConfirmGate {
    pub acknowledged: bool,
    pub typed: String,
}

impl ConfirmGate {
    pub fn toggle(&mut self) {
        self.acknowledged = !self.acknowledged;
    }

    pub fn is_open(&self, name: &str) -> bool {
        self.acknowledged && self.typed.trim() == name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_conditions_required() {
        let cases = [
            (false, "", false),
            (true, "", false),
            (false, "Welcome Flow", false),
            (true, "Welcome Flow", true),
        ];
        for (acknowledged, typed, open) in cases {
            let gate = ConfirmGate {
                acknowledged,
                typed: typed.to_string(),
            };
            assert_eq!(gate.is_open("Welcome Flow"), open, "case {:?}", (acknowledged, typed));
        }
    }

    #[test]
    fn name_match_is_trimmed_but_case_sensitive() {
        let mut gate = ConfirmGate {
            acknowledged: true,
            typed: "  Welcome Flow  ".to_string(),
        };
        assert!(gate.is_open("Welcome Flow"));

        gate.typed = "welcome flow".to_string();
        assert!(!gate.is_open("Welcome Flow"));

        gate.typed = "Welcome Flo".to_string();
        assert!(!gate.is_open("Welcome Flow"));
    }
}
