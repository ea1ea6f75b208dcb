//! Game Session: the hidden word of the current round and everything
//! players have learned about it so far.

use log::info;
use shared::FILLER;

/// Where the current round stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    AwaitingGuess,
    Won,
    Lost,
}

/// Why a guess line was turned down without touching the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessRejection {
    /// Not exactly one lowercase letter.
    Invalid,
    AlreadyGuessed,
}

/// Result of an accepted guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The letter is absent and guesses remain.
    Miss,
    /// The letter is absent and it was the last guess.
    Exhausted,
    /// The letter was revealed but the word is not complete.
    Hit,
    /// The letter completed the word.
    Solved,
}

/// State of one round.
#[derive(Debug, Clone)]
pub struct GameState {
    word: String,
    mask: String,
    guessed: [bool; 26],
    guesses_left: u32,
}

impl GameState {
    /// Starts a round on `word` with a budget of `max_guesses` wrong guesses.
    ///
    /// `word` must be non-empty lowercase ASCII; the dictionary guarantees it.
    pub fn new(word: &str, max_guesses: u32) -> Self {
        debug_assert!(!word.is_empty() && word.bytes().all(|b| b.is_ascii_lowercase()));

        info!("New round with a {} letter word", word.len());
        Self {
            word: word.to_string(),
            mask: word.chars().map(|_| FILLER).collect(),
            guessed: [false; 26],
            guesses_left: max_guesses,
        }
    }

    /// The hidden word, revealed only when the round ends.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// The word with every unguessed letter replaced by the filler
    /// character.
    pub fn mask(&self) -> &str {
        &self.mask
    }

    /// Wrong guesses still allowed before the round is lost.
    pub fn guesses_left(&self) -> u32 {
        self.guesses_left
    }

    /// Whether `letter` was already tried this round. Anything other than a
    /// lowercase ASCII letter never counts as guessed.
    pub fn is_guessed(&self, letter: char) -> bool {
        letter_index(letter).map_or(false, |i| self.guessed[i])
    }

    /// Letters tried this round, alphabetically.
    pub fn guessed_letters(&self) -> impl Iterator<Item = char> + '_ {
        (b'a'..=b'z')
            .zip(self.guessed.iter())
            .filter(|(_, guessed)| **guessed)
            .map(|(letter, _)| letter as char)
    }

    /// Derives the phase from the mask and the remaining budget.
    ///
    /// A round is won once the mask equals the word, which takes priority
    /// over an empty budget.
    pub fn phase(&self) -> RoundPhase {
        if self.mask == self.word {
            RoundPhase::Won
        } else if self.guesses_left == 0 {
            RoundPhase::Lost
        } else {
            RoundPhase::AwaitingGuess
        }
    }

    /// Status block for the current round.
    pub fn status_message(&self) -> String {
        shared::messages::status(self.mask(), self.guesses_left, self.guessed_letters())
    }

    /// Validates a raw guess line and applies it.
    ///
    /// Rejections leave the session untouched. Only a miss spends a guess.
    pub fn guess(&mut self, line: &str) -> Result<GuessOutcome, GuessRejection> {
        let letter = parse_guess(line)?;
        let index = (letter - b'a') as usize;
        let letter = char::from(letter);
        if self.guessed[index] {
            return Err(GuessRejection::AlreadyGuessed);
        }
        self.guessed[index] = true;

        if !self.word.contains(letter) {
            self.guesses_left = self.guesses_left.saturating_sub(1);
            return Ok(if self.guesses_left == 0 {
                GuessOutcome::Exhausted
            } else {
                GuessOutcome::Miss
            });
        }

        self.mask = self
            .word
            .chars()
            .zip(self.mask.chars())
            .map(|(actual, shown)| if actual == letter { actual } else { shown })
            .collect();

        Ok(if self.phase() == RoundPhase::Won {
            GuessOutcome::Solved
        } else {
            GuessOutcome::Hit
        })
    }
}

/// Accepts exactly one lowercase ASCII letter.
pub fn parse_guess(line: &str) -> Result<u8, GuessRejection> {
    match line.as_bytes() {
        [letter] if letter.is_ascii_lowercase() => Ok(*letter),
        _ => Err(GuessRejection::Invalid),
    }
}

fn letter_index(letter: char) -> Option<usize> {
    letter
        .is_ascii_lowercase()
        .then(|| (letter as u8 - b'a') as usize)
}
