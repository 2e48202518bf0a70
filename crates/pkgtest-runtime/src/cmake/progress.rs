//! Build progress parsing for CMake-driven builds.

/// Parse build progress from a line of CMake output.
///
/// Returns `(current, total)`: the Makefile generator prints percentages
/// (`[ 50%] Building ...` → `(50, 100)`), Ninja prints fractions
/// (`[150/200] Linking ...` → `(150, 200)`).
pub(crate) fn parse_build_progress(line: &str) -> Option<(usize, usize)> {
    let start = line.find('[')?;
    let end = line[start..].find(']')?;
    let bracket = &line[start + 1..start + end];

    if let Some(pct_pos) = bracket.find('%') {
        let percent = bracket[..pct_pos].trim().parse::<usize>().ok()?;
        return Some((percent, 100));
    }

    let (current, total) = bracket.split_once('/')?;
    Some((
        current.trim().parse::<usize>().ok()?,
        total.trim().parse::<usize>().ok()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_percentage_form() {
        assert_eq!(
            parse_build_progress("[ 50%] Building CXX object test.cpp.o"),
            Some((50, 100))
        );
    }

    #[test]
    fn parses_fraction_form() {
        assert_eq!(
            parse_build_progress("[150/200] Linking CXX executable tests"),
            Some((150, 200))
        );
    }

    #[test]
    fn ignores_unrelated_output() {
        assert_eq!(parse_build_progress("Some random output"), None);
        assert_eq!(parse_build_progress("[broken"), None);
        assert_eq!(parse_build_progress("[a/b] odd"), None);
    }
}
