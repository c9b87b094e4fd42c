use pal_core::logging::{log, LogCategory, LogLevel};
use pal_core::Rgb444;

use crate::ResourceError;

const JASC_MAGIC: &str = "JASC-PAL";

/// Parse a JASC-PAL text palette into packed entries.
///
/// The first three lines are the `JASC-PAL` magic, a version and the color
/// count; every following non-blank line is `r g b` with 8-bit channels.
/// Line numbers in errors are 1-based.
pub fn parse_jasc(text: &str) -> Result<Vec<Rgb444>, ResourceError> {
    let mut lines = text.lines().map(str::trim);

    match lines.next() {
        Some(JASC_MAGIC) => {}
        other => {
            return Err(ResourceError::Parse {
                line: 1,
                message: format!("expected {JASC_MAGIC} header, found {:?}", other.unwrap_or("")),
            })
        }
    }
    let _version = lines.next();
    let declared = lines.next().and_then(|l| l.parse::<usize>().ok());

    let mut colors = Vec::new();
    for (i, line) in lines.enumerate() {
        if line.is_empty() {
            continue;
        }
        let line_no = i + 4;

        let channels = line
            .split_whitespace()
            .map(|c| {
                c.parse::<u8>().map_err(|_| ResourceError::Parse {
                    line: line_no,
                    message: format!("invalid channel value {c:?}"),
                })
            })
            .collect::<Result<Vec<u8>, _>>()?;

        let &[r, g, b] = channels.as_slice() else {
            return Err(ResourceError::Parse {
                line: line_no,
                message: format!("expected 3 channels, found {}", channels.len()),
            });
        };
        colors.push(Rgb444::from_rgb888(r, g, b));
    }

    if let Some(declared) = declared.filter(|&d| d != colors.len()) {
        log(LogCategory::Resources, LogLevel::Warn, || {
            format!(
                "Resources: palette header declares {} colors, found {}",
                declared,
                colors.len()
            )
        });
    }

    Ok(colors)
}
