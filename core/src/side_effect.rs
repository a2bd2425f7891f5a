/// What the host has to do after a single `step`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SideEffect {
    None,
    /// The frame buffer was cleared
    ClearScreen,
    /// A sprite was drawn into the frame buffer
    Draw,
    /// Execution is suspended until the host calls `provide_key`
    WaitForKey,
}

/// What the host has to do after a single `tick_timers`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    None,
    /// The sound timer just ran out
    Beep,
}
