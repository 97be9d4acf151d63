//! Ordered flexible-acceptance rules.
//!
//! Each rule lets a non-canonical spelling advance the cursor. Rules are
//! evaluated top to bottom and the first match wins, so order matters:
//! `chi_ti` shadows `nasal_chi_ti`, and `ji_zi` is tried before the general
//! `j_z`.

/// What a rule sees when the input differs from the expected character.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    target: &'a [char],
    cursor: usize,
    pub expected: char,
    pub input: char,
}

impl<'a> Context<'a> {
    /// `None` when the cursor is already at the end of `target`.
    pub fn new(target: &'a [char], cursor: usize, input: char) -> Option<Self> {
        let expected = *target.get(cursor)?;
        Some(Context {
            target,
            cursor,
            expected,
            input,
        })
    }

    /// Last target character already consumed.
    pub fn previous(&self) -> Option<char> {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.target.get(i).copied())
    }

    /// Target character `offset` places past the cursor.
    pub fn at(&self, offset: usize) -> Option<char> {
        self.target.get(self.cursor + offset).copied()
    }

    pub fn next(&self) -> Option<char> {
        self.at(1)
    }

    /// True if the target starting at the cursor begins with `s`.
    pub fn lookahead_is(&self, s: &str) -> bool {
        let mut rest = self.target[self.cursor..].iter();
        s.chars().all(|c| rest.next() == Some(&c))
    }
}

pub struct FlexRule {
    pub name: &'static str,
    /// Cursor advance on match: 0, 1 or 2.
    pub advance: usize,
    pub matches: fn(&Context<'_>) -> bool,
}

impl std::fmt::Debug for FlexRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlexRule")
            .field("name", &self.name)
            .field("advance", &self.advance)
            .finish()
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'i' | 'u' | 'e' | 'o')
}

fn shi_si(c: &Context<'_>) -> bool {
    c.previous() == Some('s') && c.expected == 'h' && c.input == 'i'
}

fn tsu_tu(c: &Context<'_>) -> bool {
    c.previous() == Some('t') && c.expected == 's' && c.input == 'u'
}

fn chi_ti(c: &Context<'_>) -> bool {
    c.lookahead_is("chi") && c.expected == 'c' && c.input == 't'
}

fn fu_hu(c: &Context<'_>) -> bool {
    c.lookahead_is("fu") && c.expected == 'f' && c.input == 'h'
}

fn ji_zi(c: &Context<'_>) -> bool {
    c.lookahead_is("ji") && c.expected == 'j' && c.input == 'z'
}

fn j_z(c: &Context<'_>) -> bool {
    c.expected == 'j' && c.input == 'z'
}

fn jy_insert(c: &Context<'_>) -> bool {
    c.previous() == Some('j') && c.input == 'y' && matches!(c.expected, 'a' | 'u' | 'o')
}

fn sh_sy(c: &Context<'_>) -> bool {
    c.previous() == Some('s') && c.expected == 'h' && c.input == 'y'
}

fn ch_ty_c(c: &Context<'_>) -> bool {
    c.expected == 'c' && c.next() == Some('h') && c.input == 't'
}

fn ch_ty_h(c: &Context<'_>) -> bool {
    c.previous() == Some('c') && c.expected == 'h' && c.input == 'y'
}

fn cch_tch(c: &Context<'_>) -> bool {
    c.lookahead_is("cch") && c.expected == 'c' && c.input == 't'
}

fn nasal_skip(c: &Context<'_>) -> bool {
    c.expected == 'n'
        && c.next() == Some(c.input)
        && !is_vowel(c.input)
        && c.input != 'y'
        && c.input != 'n'
}

fn nasal_ch_ty(c: &Context<'_>) -> bool {
    c.expected == 'n' && c.next() == Some('c') && c.input == 't' && c.at(2) == Some('h')
}

fn nasal_j_z(c: &Context<'_>) -> bool {
    c.expected == 'n' && c.next() == Some('j') && c.input == 'z'
}

fn nasal_fu_hu(c: &Context<'_>) -> bool {
    c.expected == 'n' && c.next() == Some('f') && c.input == 'h' && c.at(2) == Some('u')
}

fn nasal_chi_ti(c: &Context<'_>) -> bool {
    c.previous() == Some('n') && c.lookahead_is("chi") && c.expected == 'c' && c.input == 't'
}

#[rustfmt::skip]
pub static RULES: &[FlexRule] = &[
    FlexRule { name: "shi_si", advance: 2, matches: shi_si },
    FlexRule { name: "tsu_tu", advance: 2, matches: tsu_tu },
    FlexRule { name: "chi_ti", advance: 2, matches: chi_ti },
    FlexRule { name: "fu_hu", advance: 1, matches: fu_hu },
    FlexRule { name: "ji_zi", advance: 1, matches: ji_zi },
    FlexRule { name: "j_z", advance: 1, matches: j_z },
    FlexRule { name: "jy_insert", advance: 0, matches: jy_insert },
    FlexRule { name: "sh_sy", advance: 1, matches: sh_sy },
    FlexRule { name: "ch_ty_c", advance: 1, matches: ch_ty_c },
    FlexRule { name: "ch_ty_h", advance: 1, matches: ch_ty_h },
    FlexRule { name: "cch_tch", advance: 1, matches: cch_tch },
    FlexRule { name: "nasal_skip", advance: 2, matches: nasal_skip },
    FlexRule { name: "nasal_ch_ty", advance: 2, matches: nasal_ch_ty },
    FlexRule { name: "nasal_j_z", advance: 2, matches: nasal_j_z },
    FlexRule { name: "nasal_fu_hu", advance: 2, matches: nasal_fu_hu },
    FlexRule { name: "nasal_chi_ti", advance: 2, matches: nasal_chi_ti },
];

/// First rule in [`RULES`] that accepts `ctx`.
pub fn find_rule(ctx: &Context<'_>) -> Option<&'static FlexRule> {
    RULES.iter().find(|rule| (rule.matches)(ctx))
}
