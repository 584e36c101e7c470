use chipvm_core::SpritePolicy;

/// Interpreter settings that are fixed for the life of a machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Chip8Config {
    /// Seed for `CXNN`. `None` seeds from the OS on every reset.
    pub seed: Option<u64>,
    pub sprite_policy: SpritePolicy,
}

impl Chip8Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    pub fn with_sprite_policy(self, sprite_policy: SpritePolicy) -> Self {
        Self {
            sprite_policy,
            ..self
        }
    }
}
