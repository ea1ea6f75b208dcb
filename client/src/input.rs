//! Conversion of typed lines into protocol lines.

use shared::NETWORK_NEWLINE;

/// Strips any local line ending from `line` and appends a network newline.
pub fn to_wire_line(line: &str) -> String {
    let mut wire = line.trim_end_matches(['\r', '\n']).to_string();
    wire.push_str(NETWORK_NEWLINE);
    wire
}

/// Strips the network newline (or a bare newline) from a server line.
pub fn from_wire_line(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_wire_line() {
        assert_eq!(to_wire_line("Al"), "Al\r\n");
        assert_eq!(to_wire_line("c\n"), "c\r\n");
        assert_eq!(to_wire_line("c\r\n"), "c\r\n");
        assert_eq!(to_wire_line(""), "\r\n");
    }

    #[test]
    fn test_to_wire_line_keeps_inner_spaces() {
        assert_eq!(to_wire_line(" a b \n"), " a b \r\n");
    }

    #[test]
    fn test_from_wire_line() {
        assert_eq!(from_wire_line("Your guess?\r"), "Your guess?");
        assert_eq!(from_wire_line("Your guess?\r\n"), "Your guess?");
        assert_eq!(from_wire_line("Goodbye Al"), "Goodbye Al");
    }
}
