use keymap::KeyMap;

#[derive(KeyMap, Clone, Copy, Debug, PartialEq)]
pub enum Action {
    /// Quit the application
    #[key("q")]
    Quit,
    /// Restart the current preset on a fresh grid
    #[key("r")]
    Reset,
    /// Advance the ant by one batch of steps
    #[key("space")]
    Step,
    /// Toggle auto-play
    #[key("p")]
    ToggleAutoPlay,
    /// Toggle help display
    #[key("h")]
    ToggleHelp,
    /// Trace the principal contour from the ant's current pose
    #[key("c")]
    TraceContour,
    /// Load the previous preset
    #[key("left")]
    PreviousPreset,
    /// Load the next preset
    #[key("right")]
    NextPreset,
    /// Run auto-play faster
    #[key("up")]
    Faster,
    /// Run auto-play slower
    #[key("down")]
    Slower,
}
