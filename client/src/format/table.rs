use crate::format::xterm_color;
use std::collections::HashMap;
use unicode_width::UnicodeWidthChar;

pub struct TableColumn {
    pub(crate) idx: usize,
    pub(crate) name: &'static str,
}

impl TableColumn {
    pub fn new(idx: usize, name: &'static str) -> Self {
        Self { idx, name }
    }
}

pub trait Schema<const N: usize> {
    fn names() -> [&'static TableColumn; N];
}

pub trait TableEntry<const N: usize, S: Schema<N>> {
    fn fmt(&self) -> HashMap<usize, String>;
}

pub(crate) struct TableFormatter<const N: usize, S: Schema<N>> {
    phantom_schema: std::marker::PhantomData<S>,
}

impl<const N: usize, S> TableFormatter<N, S>
where
    S: Schema<N>,
{
    pub fn new() -> Self {
        Self {
            phantom_schema: std::marker::PhantomData,
        }
    }

    fn format_data(&self, data: &[impl TableEntry<N, S>]) -> Vec<Vec<String>> {
        data.iter()
            .map(|entry| {
                let row = entry.fmt();
                let mut keys: Vec<usize> = row.keys().copied().collect();
                keys.sort_unstable();
                keys.into_iter()
                    .map(|k| row.get(&k).cloned().unwrap_or_default())
                    .collect::<Vec<String>>()
            })
            .collect::<Vec<_>>()
    }

    /// Terminal width of the text with ANSI CSI sequences skipped.
    #[inline]
    fn visible_len(text: &str) -> usize {
        let mut count = 0usize;
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                if matches!(chars.peek(), Some('[')) {
                    let _ = chars.next();
                }
                for nc in chars.by_ref() {
                    if nc == 'm' {
                        break;
                    }
                }
                continue;
            }
            count += c.width().unwrap_or(0);
        }
        count
    }

    #[inline]
    fn push_padded(result: &mut String, text: &str, width: usize) {
        result.push_str(text);
        let vlen = Self::visible_len(text);
        for _ in vlen..width {
            result.push(' ');
        }
    }

    pub fn fmt<E>(&self, data: &[E]) -> String
    where
        E: TableEntry<N, S>,
    {
        // Column widths are driven by the widest visible cell, headers included.
        let mut widths = S::names()
            .iter()
            .map(|h| Self::visible_len(h.name))
            .collect::<Vec<_>>();
        let rows = self.format_data(data);

        for row in rows.iter() {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(Self::visible_len(cell));
                }
            }
        }

        let mut result = String::new();
        for (i, header) in S::names().iter().enumerate() {
            Self::push_padded(&mut result, &xterm_color::bold(header.name), widths[i]);
            if i < S::names().len() - 1 {
                result += " | ";
            }
        }
        result += "\n";

        for (i, &width) in widths.iter().enumerate() {
            result += &"-".repeat(width);
            if i < widths.len() - 1 {
                result += "-+-";
            }
        }
        result += "\n";

        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    Self::push_padded(&mut result, cell, widths[i]);
                    if i < row.len() - 1 {
                        result += " | ";
                    }
                }
            }
            result += "\n";
        }
        result
    }
}

pub fn format_table<const N: usize, S, E>(f: &TableFormatter<N, S>, items: &[E]) -> String
where
    S: Schema<N>,
    E: TableEntry<N, S>,
{
    f.fmt(items)
}
