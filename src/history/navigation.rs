use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationDirection {
    Backward,
    Forward,
}

impl NavigationDirection {
    pub fn step(self) -> isize {
        match self {
            NavigationDirection::Backward => -1,
            NavigationDirection::Forward => 1,
        }
    }
}

/// How a single forward/backward step treats entries whose object is gone.
///
/// Config values: `step`, `skip_dead`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationPolicy {
    /// Move exactly one entry per press.
    #[default]
    Step,
    /// Keep moving past dead, non-reresolvable entries.
    SkipDead,
}

/// Raw directional button state sampled by the host once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavigationInput {
    pub forward: bool,
    pub backward: bool,
    /// Input is ignored while the editor window is in the background.
    pub application_active: bool,
}

impl NavigationInput {
    pub fn active(forward: bool, backward: bool) -> Self {
        Self {
            forward,
            backward,
            application_active: true,
        }
    }
}

/// Rising-edge detector over the directional buttons.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct NavigationEdges {
    forward_held: bool,
    backward_held: bool,
}

impl NavigationEdges {
    /// Directions that went from released to pressed since the last sample,
    /// backward first.
    pub(crate) fn update(&mut self, input: NavigationInput) -> Vec<NavigationDirection> {
        if !input.application_active {
            return Vec::new();
        }
        let mut fired = Vec::with_capacity(2);
        if input.backward && !self.backward_held {
            fired.push(NavigationDirection::Backward);
        }
        if input.forward && !self.forward_held {
            fired.push(NavigationDirection::Forward);
        }
        self.forward_held = input.forward;
        self.backward_held = input.backward;
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_press() {
        let mut edges = NavigationEdges::default();
        assert_eq!(
            edges.update(NavigationInput::active(false, true)),
            vec![NavigationDirection::Backward]
        );
        assert!(edges.update(NavigationInput::active(false, true)).is_empty());
        assert!(edges.update(NavigationInput::active(false, false)).is_empty());
        assert_eq!(
            edges.update(NavigationInput::active(false, true)),
            vec![NavigationDirection::Backward]
        );
    }

    #[test]
    fn both_edges_fire_backward_first() {
        let mut edges = NavigationEdges::default();
        assert_eq!(
            edges.update(NavigationInput::active(true, true)),
            vec![NavigationDirection::Backward, NavigationDirection::Forward]
        );
    }

    #[test]
    fn inactive_application_keeps_previous_state() {
        let mut edges = NavigationEdges::default();
        edges.update(NavigationInput::active(true, false));
        let background = NavigationInput {
            forward: false,
            backward: false,
            application_active: false,
        };
        assert!(edges.update(background).is_empty());
        assert!(edges.update(NavigationInput::active(true, false)).is_empty());
    }
}
