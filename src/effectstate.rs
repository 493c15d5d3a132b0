use crate::effects::Action;

/// Where the active effect is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectState {
    Uninitialized,
    Active,
    Removed,
}

impl EffectState {
    /// State after `action`, or None if the action is not allowed here.
    pub fn after(self, action: Action) -> Option<EffectState> {
        match (self, action) {
            (_, Action::Init) => Some(EffectState::Active),
            (EffectState::Active, Action::Tick) => Some(EffectState::Active),
            (EffectState::Active, Action::Exit) => Some(EffectState::Removed),
            _ => None,
        }
    }
}
