use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::Deserialize;
use thiserror::Error;

/// Number of items in each experience. Both banks present ten four-option
/// items, so a finished session always records ten answers.
pub const QUESTION_COUNT: usize = 10;

pub static QUESTIONNAIRE: Lazy<QuestionBank> = Lazy::new(|| {
    serde_json::from_str(include_str!("../resources/questionnaire.json"))
        .expect("questionnaire master data is valid")
});

pub static SCENARIOS: Lazy<ScenarioBank> = Lazy::new(|| {
    serde_json::from_str(include_str!("../resources/scenarios.json"))
        .expect("scenario master data is valid")
});

pub static PROFILES: Lazy<ProfileSet> = Lazy::new(|| {
    serde_json::from_str(include_str!("../resources/results.json"))
        .expect("result profile master data is valid")
});

/// The four adult attachment styles. Declaration order doubles as the
/// tie-break order when two styles hold the same count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Secure,
    Anxious,
    Avoidant,
    Fearful,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Secure,
        Category::Anxious,
        Category::Avoidant,
        Category::Fearful,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Category::Secure => "secure",
            Category::Anxious => "anxious",
            Category::Avoidant => "avoidant",
            Category::Fearful => "fearful",
        }
    }

    /// Position on the avoidance-anxiety meter, in percent. Avoidant sits
    /// at the left end, anxious at the right, secure in the centre and
    /// fearful between avoidant and secure.
    pub fn meter_position(self) -> u8 {
        match self {
            Category::Secure => 50,
            Category::Anxious => 85,
            Category::Avoidant => 15,
            Category::Fearful => 35,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One of the four options presented for an item. Input accepts the
/// numbers 1-4 as well as the letters a-d in either case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    pub const ALL: [Choice; 4] = [Choice::A, Choice::B, Choice::C, Choice::D];
}

impl FromStr for Choice {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Error> {
        match value.trim() {
            "1" | "a" | "A" => Ok(Choice::A),
            "2" | "b" | "B" => Ok(Choice::B),
            "3" | "c" | "C" => Ok(Choice::C),
            "4" | "d" | "D" => Ok(Choice::D),
            _ => Err(Error::IllegalAnswer),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerOption {
    pub text: String,
    pub category: Category,
}

/// A questionnaire item. The four options cover all four styles, one
/// option per style, so every answer adds exactly one point somewhere.
#[derive(Debug, Clone, Deserialize)]
pub struct Question {
    pub text: String,
    pub options: [AnswerOption; 4],
}

impl Question {
    pub fn category(&self, choice: Choice) -> Category {
        self.options[choice as usize].category
    }
}

/// Master data for the multiple-choice questionnaire.
#[derive(Debug, Deserialize)]
pub struct QuestionBank {
    pub questions: Vec<Question>,
}

/// A simulator item, rendered as a short run of incoming chat messages
/// with four candidate replies. Same option rules as [`Question`].
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub messages: Vec<String>,
    pub replies: [AnswerOption; 4],
}

impl Scenario {
    pub fn category(&self, choice: Choice) -> Category {
        self.replies[choice as usize].category
    }
}

/// Master data for the chat-style scenario simulator.
#[derive(Debug, Deserialize)]
pub struct ScenarioBank {
    pub scenarios: Vec<Scenario>,
}

/// Anything a sheet of answers can be scored against. Implemented by both
/// banks so the same sheet format serves either experience.
pub trait Instrument {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Style awarded for picking `choice` on the item at `index`, or
    /// `None` when the index is past the end of the bank.
    fn category(&self, index: usize, choice: Choice) -> Option<Category>;
}

impl Instrument for QuestionBank {
    fn len(&self) -> usize {
        self.questions.len()
    }

    fn category(&self, index: usize, choice: Choice) -> Option<Category> {
        self.questions
            .get(index)
            .map(|question| question.category(choice))
    }
}

impl Instrument for ScenarioBank {
    fn len(&self) -> usize {
        self.scenarios.len()
    }

    fn category(&self, index: usize, choice: Choice) -> Option<Category> {
        self.scenarios
            .get(index)
            .map(|scenario| scenario.category(choice))
    }
}

/// Result-screen content for one style.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub emoji: String,
    pub name: String,
    pub description: String,
    pub traits: Vec<String>,
    pub ideal_partner: String,
    pub advice: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileSet {
    secure: Profile,
    anxious: Profile,
    avoidant: Profile,
    fearful: Profile,
}

impl ProfileSet {
    pub fn get(&self, category: Category) -> &Profile {
        match category {
            Category::Secure => &self.secure,
            Category::Anxious => &self.anxious,
            Category::Avoidant => &self.avoidant,
            Category::Fearful => &self.fearful,
        }
    }
}

/// Per-style answer counts for one session. The tally is a value:
/// recording consumes it and hands back the incremented copy, so session
/// state is whatever the caller threads through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreTally {
    counts: [u8; 4],
}

impl ScoreTally {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn record(mut self, category: Category) -> Self {
        self.counts[category as usize] += 1;
        self
    }

    pub fn count(&self, category: Category) -> u8 {
        self.counts[category as usize]
    }

    /// Counts in declaration order (secure, anxious, avoidant, fearful).
    pub fn counts(&self) -> [u8; 4] {
        self.counts
    }

    pub fn total(&self) -> u8 {
        self.counts.iter().sum()
    }

    /// Ranks the styles by descending count and returns the top two. The
    /// sort is stable, so equal counts fall back to declaration order.
    pub fn classify(&self) -> Classification {
        let mut ranked = Category::ALL;
        ranked.sort_by_key(|category| std::cmp::Reverse(self.count(*category)));
        Classification {
            primary: ranked[0],
            secondary: ranked[1],
        }
    }
}

/// The reported outcome: the leading style and the runner-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub primary: Category,
    pub secondary: Category,
}

/// Builds the full result screen for a finished session: primary profile,
/// traits, advice, the runner-up style and the avoidance-anxiety meter.
pub fn render_report(tally: &ScoreTally) -> String {
    let result = tally.classify();
    let profile = PROFILES.get(result.primary);
    let runner_up = PROFILES.get(result.secondary);

    let mut out = String::new();
    out.push_str(&format!("{} {}\n\n", profile.emoji, profile.name));
    out.push_str(&format!("{}\n\n", profile.description));
    out.push_str("Key traits:\n");
    for item in &profile.traits {
        out.push_str(&format!("  - {}\n", item));
    }
    out.push('\n');
    out.push_str(&format!("Ideal partner: {}\n", profile.ideal_partner));
    out.push_str(&format!("Advice: {}\n\n", profile.advice));
    out.push_str(&format!(
        "Secondary tendency: {} {} ({}/{} answers)\n\n",
        runner_up.emoji,
        runner_up.name,
        tally.count(result.secondary),
        tally.total(),
    ));
    out.push_str(&meter(result.primary));
    out.push('\n');
    out
}

/// Draws the avoidance-anxiety axis: marker at the style's position, tick
/// and label at the secure midpoint.
fn meter(category: Category) -> String {
    const WIDTH: usize = 25;
    let marker = usize::from(category.meter_position()) * (WIDTH - 1) / 100;
    let centre = usize::from(Category::Secure.meter_position()) * (WIDTH - 1) / 100;
    let mut line = String::from("avoidant [");
    for cell in 0..WIDTH {
        line.push(if cell == marker {
            '*'
        } else if cell == centre {
            '|'
        } else {
            '-'
        });
    }
    line.push_str("] anxious");
    line.push('\n');
    line.push_str(&" ".repeat("avoidant [".len() + centre - "secure".len() / 2));
    line.push_str("secure");
    line
}

/// Raw answers for one recorded session, prior to scoring. Slots fill
/// sequentially with [`AnswerSheet::push`] or by question number with
/// [`AnswerSheet::insert`]; scoring refuses a sheet with gaps.
#[derive(Debug, Clone, Default)]
pub struct AnswerSheet {
    choices: [Option<Choice>; QUESTION_COUNT],
    offset: usize,
}

impl AnswerSheet {
    pub fn push(&mut self, choice: Choice) -> Result<(), Error> {
        if self.offset < QUESTION_COUNT {
            self.choices[self.offset] = Some(choice);
            self.offset += 1;
            Ok(())
        } else {
            Err(Error::IllegalQuestion)
        }
    }

    /// Stores an answer by 1-based question number.
    pub fn insert(&mut self, question_no: u8, choice: Choice) -> Result<(), Error> {
        if question_no < 1 {
            return Err(Error::IllegalQuestion);
        }
        let offset = usize::from(question_no - 1);
        if offset < QUESTION_COUNT {
            self.choices[offset] = Some(choice);
            Ok(())
        } else {
            Err(Error::IllegalQuestion)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.choices.iter().all(|choice| choice.is_some())
    }

    /// Folds the sheet into a tally against `instrument`. Every slot must
    /// be filled and the instrument must cover all ten items.
    pub fn to_tally(&self, instrument: &impl Instrument) -> Result<ScoreTally, Error> {
        if !self.is_complete() {
            return Err(Error::NotFilled);
        }
        let mut tally = ScoreTally::new();
        for (index, choice) in self.choices.iter().enumerate() {
            let choice = choice.ok_or(Error::NotFilled)?;
            let category = instrument
                .category(index, choice)
                .ok_or(Error::IllegalQuestion)?;
            tally = tally.record(category);
        }
        Ok(tally)
    }
}

/// Reads recorded sheets from CSV. Each row is an id followed by ten
/// answers, each `1`-`4` or `a`-`d`, with no header row:
///
/// ```text
/// alice,1,2,3,1,4,2,2,1,3,4
/// ```
///
/// Rows are yielded individually so one malformed row never takes down a
/// whole batch.
pub fn read_sheets<R: std::io::Read>(
    reader: R,
) -> impl Iterator<Item = Result<(String, AnswerSheet), Error>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
        .into_records()
        .map(|row| -> Result<(String, AnswerSheet), Error> {
            let row = row?;
            let id = row.get(0).unwrap_or_default().to_string();
            let mut sheet = AnswerSheet::default();
            for field in row.iter().skip(1) {
                sheet.push(field.parse()?)?;
            }
            Ok((id, sheet))
        })
}

#[derive(Debug, Error)]
pub enum Error {
    /// The answer token is not one of 1-4 or a-d.
    #[error("answer must be one of 1-4 or a-d")]
    IllegalAnswer,
    /// Question number outside the ten-item range.
    #[error("question number out of range")]
    IllegalQuestion,
    /// The sheet still has unanswered items.
    #[error("answer sheet is not fully filled in")]
    NotFilled,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
