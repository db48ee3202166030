//! Tesseract TSV output to recognized lines.
//!
//! Columns: level, page_num, block_num, par_num, line_num, word_num, left,
//! top, width, height, conf, text. Level 4 rows are text lines and level 5
//! rows are words.

use crate::models::{BoundingBox, RecognizedLine};

const LEVEL_LINE: u32 = 4;
const LEVEL_WORD: u32 = 5;

type LineKey = (u32, u32, u32, u32);

#[derive(Debug)]
struct LineAccumulator {
    key: LineKey,
    line_box: Option<BoundingBox>,
    word_box: Option<BoundingBox>,
    words: Vec<String>,
}

#[derive(Debug)]
struct Row<'a> {
    level: u32,
    key: LineKey,
    bbox: BoundingBox,
    text: &'a str,
}

fn parse_row(row: &str) -> Option<Row<'_>> {
    let mut cols = row.splitn(12, '\t');
    let mut next_u32 = || cols.next()?.trim().parse::<u32>().ok();

    let level = next_u32()?;
    let key = (next_u32()?, next_u32()?, next_u32()?, next_u32()?);
    let _word = next_u32()?;
    let (left, top, width, height) = (next_u32()?, next_u32()?, next_u32()?, next_u32()?);
    let _conf = cols.next()?;
    let text = cols.next().unwrap_or("").trim_end_matches(['\r', '\n']);

    Some(Row {
        level,
        key,
        bbox: BoundingBox::new(left as f64, top as f64, width as f64, height as f64),
        text,
    })
}

/// Group TSV word rows into lines in the order Tesseract reports them.
/// Lines with no non-blank words are dropped. Header or malformed rows are
/// skipped.
pub fn lines_from_tsv(tsv: &str, scale: f64) -> Vec<RecognizedLine> {
    let mut lines: Vec<LineAccumulator> = Vec::new();

    for row in tsv.lines().filter_map(parse_row) {
        if row.level != LEVEL_LINE && row.level != LEVEL_WORD {
            continue;
        }

        let index = match lines.iter().position(|l| l.key == row.key) {
            Some(index) => index,
            None => {
                lines.push(LineAccumulator {
                    key: row.key,
                    line_box: None,
                    word_box: None,
                    words: Vec::new(),
                });
                lines.len() - 1
            }
        };
        let line = &mut lines[index];

        if row.level == LEVEL_LINE {
            line.line_box = Some(row.bbox);
            continue;
        }

        let word = row.text.trim();
        if word.is_empty() {
            continue;
        }
        line.words.push(word.to_string());
        line.word_box = Some(match line.word_box {
            Some(existing) => existing.union(&row.bbox),
            None => row.bbox,
        });
    }

    lines
        .into_iter()
        .filter(|line| !line.words.is_empty())
        .filter_map(|line| {
            let bbox = line.line_box.or(line.word_box)?;
            Some(RecognizedLine::new(line.words.join(" "), bbox.scaled(scale)))
        })
        .collect()
}
