//! Every line the server writes to its clients.
//!
//! Each message already carries its network newline so callers can hand it
//! straight to a connection.

pub const WELCOME: &str = "Welcome to our word game. What is your name? \r\n";
pub const EMPTY_NAME: &str = "The user name that you entered was empty, please try again: \r\n";
pub const NAME_TAKEN: &str = "The user name that you entered was taken, please try again: \r\n";
pub const YOUR_GUESS: &str = "Your guess?\r\n";
pub const NO_PLAYER: &str = "There is currently no player\r\n";
pub const NOT_YOUR_TURN: &str = "It is not yet your turn!\r\n";
pub const INVALID_GUESS: &str = "Your guess is not valid, please try again:\r\n";
pub const ALREADY_GUESSED: &str = "That was already guessed, try again:\r\n";
pub const NOT_IN_WORD: &str = "Your guess was not in the word\r\n";
pub const GOOD_GUESS: &str = "Good guess!\r\n";
pub const YOU_WIN: &str = "Game over! Congrats! You win!\r\n";
pub const NEW_GAME: &str = "Let's start a new game!\r\n";
pub const LINE_TOO_LONG: &str = "Your line was too long, closing connection\r\n";

const STATUS_RULE: &str = "***************\r\n";

pub fn joined(name: &str) -> String {
    format!("{} has just joined the game, hello there!\r\n", name)
}

pub fn turn_of(name: &str) -> String {
    format!("It's {}'s turn\r\n", name)
}

pub fn winner(name: &str) -> String {
    format!("Game over! {} won!\r\n", name)
}

/// Loss announcement naming the player who spent the last guess.
pub fn lost(name: &str, word: &str) -> String {
    format!(
        "{} used up all the guesses, you lost!\r\nThe word was {}.\r\n",
        name, word
    )
}

pub fn goodbye(name: &str) -> String {
    format!("Goodbye {}\r\n", name)
}

/// Status block showing the mask, the remaining budget and the letters
/// tried so far, in alphabetical order.
pub fn status(mask: &str, guesses_left: u32, guessed: impl IntoIterator<Item = char>) -> String {
    let mut letters = String::new();
    for letter in guessed {
        letters.push(letter);
        letters.push(' ');
    }

    format!(
        "{rule}Word to guess: {mask}\r\nGuesses remaining: {guesses_left}\r\n\
         Letters guessed: \r\n{letters}\r\n{rule}",
        rule = STATUS_RULE,
    )
}
