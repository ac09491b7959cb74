//! Screen reconstruction with the `vt100` emulator.

use termtile::Rgb;

/// Parse `bytes` on a `cols` x `rows` virtual terminal.
pub fn parse_screen(bytes: &[u8], cols: u16, rows: u16) -> vt100::Parser {
    let mut parser = vt100::Parser::new(rows, cols, 0);
    parser.process(bytes);
    parser
}

/// Character shown at `(x, y)`, or `None` for an empty cell.
pub fn char_at(screen: &vt100::Screen, x: u16, y: u16) -> Option<char> {
    screen
        .cell(y, x)
        .and_then(|cell| cell.contents().chars().next())
}

/// Foreground and background at `(x, y)` as RGB, if set as truecolor.
pub fn colors_at(screen: &vt100::Screen, x: u16, y: u16) -> Option<(Rgb, Rgb)> {
    let cell = screen.cell(y, x)?;
    match (cell.fgcolor(), cell.bgcolor()) {
        (vt100::Color::Rgb(fr, fg, fb), vt100::Color::Rgb(br, bg, bb)) => {
            Some((Rgb::new(fr, fg, fb), Rgb::new(br, bg, bb)))
        }
        _ => None,
    }
}

/// Text of row `y` as the emulator shows it.
pub fn row_text(screen: &vt100::Screen, y: u16) -> String {
    let (_, cols) = screen.size();
    screen
        .rows(0, cols)
        .nth(y as usize)
        .unwrap_or_default()
}
