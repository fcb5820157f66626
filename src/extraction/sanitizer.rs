//! Comment and string-literal blanking.
//!
//! The scanner works on plain regexes, so anything that merely looks like a
//! declaration inside a comment or literal must be gone before it runs. Every
//! blanked byte becomes a space and newlines are kept: the output has the
//! same length and line structure as the input, which lets callers map a
//! match in the sanitized text back onto the raw text by byte offset.

/// Blank comments, quoted strings and heredoc/nowdoc bodies in `source`.
pub fn sanitize(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = bytes.to_vec();
    let mut i = 0;

    while i < bytes.len() {
        i = match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => blank_line_comment(&mut out, i),
            // `#[` opens an attribute, not a comment
            b'#' if bytes.get(i + 1) != Some(&b'[') => blank_line_comment(&mut out, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => blank_block_comment(&mut out, i),
            quote @ (b'\'' | b'"') => blank_quoted(&mut out, i, quote),
            b'<' if bytes[i..].starts_with(b"<<<") => blank_heredoc(&mut out, i),
            _ => i + 1,
        };
    }

    // Only ASCII delimiters start or end a blanked range, so no multi-byte
    // sequence is ever split.
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

fn blank(out: &mut [u8], start: usize, end: usize) {
    let end = end.min(out.len());
    for b in &mut out[start..end] {
        if *b != b'\n' && *b != b'\r' {
            *b = b' ';
        }
    }
}

fn find_from(haystack: &[u8], start: usize, needle: &[u8]) -> Option<usize> {
    haystack
        .get(start..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + start)
}

fn blank_line_comment(out: &mut [u8], start: usize) -> usize {
    let end = out[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(out.len(), |p| p + start);
    blank(out, start, end);
    end
}

fn blank_block_comment(out: &mut [u8], start: usize) -> usize {
    let end = find_from(out, start + 2, b"*/").map_or(out.len(), |p| p + 2);
    blank(out, start, end);
    end
}

/// Blanks the literal's contents, keeping both quote characters.
fn blank_quoted(out: &mut [u8], start: usize, quote: u8) -> usize {
    let close = literal_end(out, start, quote);
    blank(out, start + 1, close);
    close + 1
}

/// Index of the quote closing the literal opened at `start`, or the end of
/// input. `{$ ... }` interpolations inside double quotes may hold quotes of
/// their own.
fn literal_end(text: &[u8], start: usize, quote: u8) -> usize {
    let mut j = start + 1;
    while j < text.len() {
        match text[j] {
            b'\\' => j += 2,
            b'{' if quote == b'"' && text.get(j + 1) == Some(&b'$') => {
                j = interpolation_end(text, j);
            }
            b if b == quote => return j,
            _ => j += 1,
        }
    }
    text.len()
}

/// Index just past the `}` closing the interpolation opened at `open`.
fn interpolation_end(text: &[u8], open: usize) -> usize {
    let mut depth = 0usize;
    let mut j = open;
    while j < text.len() {
        match text[j] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return j + 1;
                }
            }
            quote @ (b'\'' | b'"') => j = literal_end(text, j, quote),
            _ => {}
        }
        j += 1;
    }
    text.len()
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn blank_heredoc(out: &mut [u8], start: usize) -> usize {
    let mut j = start + 3;
    while matches!(out.get(j), Some(b' ' | b'\t')) {
        j += 1;
    }
    if matches!(out.get(j), Some(b'\'' | b'"')) {
        j += 1;
    }
    let ident_start = j;
    while out.get(j).is_some_and(|&b| is_ident_byte(b)) {
        j += 1;
    }
    if j == ident_start {
        return start + 3;
    }
    let ident = out[ident_start..j].to_vec();

    let Some(newline) = out[j..].iter().position(|&b| b == b'\n') else {
        return j;
    };
    let body_start = j + newline + 1;

    let mut line_start = body_start;
    while line_start < out.len() {
        let mut k = line_start;
        while matches!(out.get(k), Some(b' ' | b'\t')) {
            k += 1;
        }
        let closes = out[k..].starts_with(&ident)
            && !out.get(k + ident.len()).is_some_and(|&b| is_ident_byte(b));
        if closes {
            blank(out, body_start, line_start);
            return k + ident.len();
        }
        line_start = out[line_start..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(out.len(), |p| line_start + p + 1);
    }

    blank(out, body_start, out.len());
    out.len()
}
