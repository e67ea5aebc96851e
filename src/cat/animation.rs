/// Every sprite sheet the cat can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Sprite {
    Walk,
    Run,
    Sit,
    Sit2,
    Lick,
    Lick2,
}

impl Sprite {
    /// Frames in the sheet's single row.
    pub const fn frames(self) -> u8 {
        match self {
            Sprite::Walk | Sprite::Run => 8,
            Sprite::Sit | Sprite::Sit2 | Sprite::Lick | Sprite::Lick2 => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sprite::Walk => "walk",
            Sprite::Run => "run",
            Sprite::Sit => "sit",
            Sprite::Sit2 => "sit2",
            Sprite::Lick => "lick",
            Sprite::Lick2 => "lick2",
        }
    }
}

/// Which sprite is showing and where in its loop it is.
#[derive(Debug, Clone, Copy)]
pub struct AnimationState {
    pub sprite: Sprite,
    pub frame: u8,
    /// Ticks spent on the current frame.
    pub tick: u32,
}

impl AnimationState {
    pub fn new(sprite: Sprite) -> Self {
        Self {
            sprite,
            frame: 0,
            tick: 0,
        }
    }

    /// Switch sprites, restarting from frame 0. No-op if already showing it.
    pub fn set(&mut self, sprite: Sprite) {
        if self.sprite != sprite {
            *self = Self::new(sprite);
        }
    }

    /// Count one tick. Returns `true` when the frame wrapped back to 0,
    /// i.e. a full animation cycle just completed.
    pub fn advance(&mut self, ticks_per_frame: u32) -> bool {
        self.tick += 1;
        if self.tick < ticks_per_frame {
            return false;
        }
        self.tick = 0;
        self.frame = (self.frame + 1) % self.sprite.frames();
        self.frame == 0
    }
}
