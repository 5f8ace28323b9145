//! Line tokenizing shared by both file sections.

/// Split a raw line on spaces and scrub whitespace/NUL noise out of every
/// token. Tokens that scrub down to nothing are dropped.
pub fn split_normalized(line: &str) -> Vec<String> {
    line.split(' ')
        .map(scrub)
        .filter(|tok| !tok.is_empty())
        .collect()
}

fn scrub(tok: &str) -> String {
    tok.chars()
        .filter(|&c| c != ' ' && c != '\t' && c != '\n' && c != '\r' && c != '\0')
        .collect()
}

/// Reduce a motion row to its numeric tokens. Every character that is not a
/// digit, `-`, or `.` becomes a space, so tab-separated rows split cleanly.
/// This destroys alphabetic characters too; motion rows are assumed to be
/// pure numbers. At most `cap` tokens are kept.
pub fn numeric_tokens(line: &str, cap: usize) -> Vec<String> {
    let spaced: String = line.chars()
        .map(|c| {
            if c.is_ascii_digit() || c == '-' || c == '.' { c } else { ' ' }
        })
        .collect();
    let mut toks: Vec<String> = spaced.split(' ')
        .filter(|tok| !tok.is_empty())
        .map(str::to_string)
        .collect();
    if toks.len() > cap {
        warn!("motion row has {} values but the channel cap is {}; \
            dropping the extras", toks.len(), cap);
        toks.truncate(cap);
    }
    toks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_whitespace() {
        assert_eq!(
            split_normalized("  ROOT Hips \r"),
            vec!["ROOT", "Hips"],
        );
        assert_eq!(split_normalized("\tJOINT Knee"), vec!["JOINT", "Knee"]);
        assert_eq!(split_normalized(""), Vec::<String>::new());
        assert_eq!(split_normalized(" \t "), Vec::<String>::new());
    }

    #[test]
    fn tabs_are_noise_not_separators() {
        // Only spaces separate tokens; a tab inside a token is scrubbed,
        // fusing the words around it.
        assert_eq!(split_normalized("ROOT\tHips"), vec!["ROOTHips"]);
    }

    #[test]
    fn numeric_rows_split_on_tabs() {
        assert_eq!(
            numeric_tokens("0.0\t10.0\t-90.5", 96),
            vec!["0.0", "10.0", "-90.5"],
        );
    }

    #[test]
    fn numeric_rows_destroy_letters() {
        // Anything non-numeric becomes a separator, by design.
        assert_eq!(
            numeric_tokens("1.5 abc 2e3", 96),
            vec!["1.5", "2", "3"],
        );
    }

    #[test]
    fn numeric_rows_respect_the_cap() {
        assert_eq!(numeric_tokens("1 2 3 4 5", 3), vec!["1", "2", "3"]);
        assert_eq!(numeric_tokens("1 2 3", 3), vec!["1", "2", "3"]);
    }
}
