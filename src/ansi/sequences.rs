//! Constant ANSI escape sequences.

/// Clear entire screen.
pub const CLEAR_SCREEN: &str = "\x1b[2J";

/// Hide cursor.
pub const CURSOR_HIDE: &str = "\x1b[?25l";

/// Show cursor.
pub const CURSOR_SHOW: &str = "\x1b[?25h";

/// Enable alternative screen buffer.
pub const ALT_SCREEN_ON: &str = "\x1b[?1049h";

/// Disable alternative screen buffer.
pub const ALT_SCREEN_OFF: &str = "\x1b[?1049l";

/// Set window title prefix (OSC 0).
pub const TITLE_PREFIX: &str = "\x1b]0;";

/// Set window title suffix (BEL).
pub const TITLE_SUFFIX: &str = "\x07";

/// Session entry: alternate screen on, clear it, hide cursor.
pub const SESSION_ENTER: &str = "\x1b[?1049h\x1b[2J\x1b[?25l";

/// Session exit: clear, alternate screen off, show cursor.
pub const SESSION_EXIT: &str = "\x1b[2J\x1b[?1049l\x1b[?25h";

/// Leading sequence of every presented frame.
pub const FRAME_START: &str = CURSOR_HIDE;
