use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Print, Stylize},
    terminal::{Clear, ClearType},
};
use worldclock_core::{
    Frame,
    render::{ClockFace, MINUTE_HAND, SECOND_HAND},
};

/// Repaint the whole screen with `frame`.
pub fn draw(frame: &Frame, footer: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;

    if frame.panels.is_empty() {
        queue!(out, Print("No locations yet. Add one with `add <city>`.\r\n"))?;
    }

    for panel in &frame.panels {
        for row in panel.rows() {
            write_row(&mut out, &row)?;
        }
        queue!(out, Print("\r\n"))?;
    }
    for notice in &frame.notices {
        queue!(out, Print(format!("! {notice}").yellow()), Print("\r\n"))?;
    }

    queue!(out, Print("\r\n"), Print(footer.dark_grey()), Print("\r\n"))?;
    out.flush()
}

/// Hands get their own colours; the rest of the row is printed as is.
fn write_row(out: &mut impl Write, row: &str) -> io::Result<()> {
    for (i, c) in row.chars().enumerate() {
        if i < ClockFace::WIDTH && c == MINUTE_HAND {
            queue!(out, Print(c.blue()))?;
        } else if i < ClockFace::WIDTH && c == SECOND_HAND {
            queue!(out, Print(c.red()))?;
        } else {
            queue!(out, Print(c))?;
        }
    }
    queue!(out, Print("\r\n"))
}
