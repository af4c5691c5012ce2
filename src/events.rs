pub enum Event {
    DriverEvent(DriverEvent),
    AppEvent(AppEvent),
}

pub enum DriverEvent {
    /// Lengthen (or, when negative, shorten) the time between generations by this many
    /// milliseconds
    Interval(i64),

    /// Change the seeding density by this much
    Density(f64),

    /// Switch between the light and dark theme
    ToggleTheme,
}

pub enum AppEvent {
    /// Move the overlay's anchor by this many cells
    MoveAnchor { dx: i32, dy: i32 },

    /// The terminal now has this many character columns and rows
    Resize { cols: u16, rows: u16 },

    /// Exit the application
    Exit,
}
