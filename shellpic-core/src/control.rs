/// Move the cursor to `row`, `col` (1-based).
pub fn move_cursor(row: u16, col: u16) -> String {
    format!("\x1b[{row};{col}f")
}

pub fn save_cursor() -> &'static str {
    "\x1b[s"
}

pub fn restore_cursor() -> &'static str {
    "\x1b[r"
}

pub fn clear_screen() -> &'static str {
    "[\x1b[2J"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequences() {
        assert_eq!(move_cursor(3, 14), "\x1b[3;14f");
        assert_eq!(save_cursor(), "\x1b[s");
        assert_eq!(restore_cursor(), "\x1b[r");
        assert_eq!(clear_screen(), "[\x1b[2J");
    }
}
