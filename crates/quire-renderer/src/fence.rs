//! Code block tracking for line-based scanning.
//!
//! Directive expansion and container handling both work line by line and
//! must leave fenced and indented code untouched.

/// Tracks code fence state during line-by-line processing.
///
/// Code fences in `CommonMark` can use backticks or tildes (three or more).
/// The closing fence must use the same character and be at least as long
/// as the opening fence.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    /// Character and length of the open fence.
    open: Option<(char, usize)>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Check if currently inside a fenced code block.
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Update fence state based on a line.
    pub(crate) fn update(&mut self, line: &str) {
        let trimmed = line.trim_start();

        match self.open {
            Some((ch, len)) => {
                if fence_run(trimmed).is_some_and(|(c, n)| {
                    c == ch && n >= len && trimmed[n..].trim().is_empty()
                }) {
                    self.open = None;
                }
            }
            None => self.open = fence_run(trimmed),
        }
    }

    /// Fence line that closes the open fence, if any.
    fn closing(&self) -> Option<String> {
        self.open.map(|(ch, len)| ch.to_string().repeat(len))
    }
}

/// The fence line needed to close a code fence left open at the end of
/// `text`, or `None` when every fence is closed.
///
/// # Example
///
/// ```
/// use quire_renderer::unclosed_fence;
///
/// assert_eq!(unclosed_fence("````js\nlet x = 1;"), Some("````".to_owned()));
/// assert_eq!(unclosed_fence("```\ncode\n```\n"), None);
/// ```
#[must_use]
pub fn unclosed_fence(text: &str) -> Option<String> {
    let mut tracker = FenceTracker::new();
    for line in text.lines() {
        tracker.update(line);
    }
    tracker.closing()
}

/// Tracks indented code blocks (four or more columns of indentation).
///
/// An indented line starts a code block only after a blank line and outside
/// a list; inside a list the same indentation continues the list item.
#[derive(Debug)]
pub(crate) struct IndentTracker {
    in_code: bool,
    in_list: bool,
    prev_blank: bool,
}

impl Default for IndentTracker {
    fn default() -> Self {
        Self {
            in_code: false,
            in_list: false,
            prev_blank: true,
        }
    }
}

impl IndentTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Update state with `line` and report whether it is indented code.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        if line.trim().is_empty() {
            self.prev_blank = true;
            return false;
        }

        let is_code = if indent_width(line) >= 4 {
            self.in_code = self.in_code || (self.prev_blank && !self.in_list);
            self.in_code
        } else {
            self.in_code = false;
            self.in_list = starts_list_item(line) || (self.in_list && !self.prev_blank);
            false
        };
        self.prev_blank = false;
        is_code
    }
}

/// Leading whitespace in columns, with tabs stopping every four columns.
fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += 4 - width % 4,
            _ => break,
        }
    }
    width
}

/// Whether `line` begins with a bullet (`-`, `*`, `+`) or ordered list marker.
fn starts_list_item(line: &str) -> bool {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed.strip_prefix(['-', '*', '+']) {
        return rest.is_empty() || rest.starts_with([' ', '\t']);
    }
    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 || digits > 9 {
        return false;
    }
    let rest = &trimmed[digits..];
    rest.strip_prefix(['.', ')'])
        .is_some_and(|after| after.is_empty() || after.starts_with([' ', '\t']))
}

/// Fence character and run length when `trimmed` starts with three or more
/// backticks or tildes.
fn fence_run(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next().filter(|&c| c == '`' || c == '~')?;
    let count = trimmed.chars().take_while(|&c| c == first).count();
    (count >= 3).then_some((first, count))
}
