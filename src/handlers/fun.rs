//! Games: dice, 8ball, joke.

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use regex::Regex;

use super::core::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};

/// Source of uniform draws in `1..=sides`.
pub trait Roller: Send + Sync {
    fn roll(&self, sides: u32) -> u32;
}

/// [`Roller`] backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandRoller;

impl Roller for RandRoller {
    fn roll(&self, sides: u32) -> u32 {
        rand::thread_rng().gen_range(1..=sides.max(1))
    }
}

fn pick<'a>(roller: &dyn Roller, items: &[&'a str]) -> &'a str {
    let n = u32::try_from(items.len()).unwrap_or(u32::MAX);
    let idx = roller.roll(n).saturating_sub(1) as usize;
    items.get(idx).copied().unwrap_or_default()
}

/// `dice` and `dice XdY`.
pub struct DiceHandler {
    command: String,
    pattern: Regex,
    max_count: u32,
    max_sides: u32,
    roller: Arc<dyn Roller>,
}

impl DiceHandler {
    /// `command` is the full trigger, e.g. `.dice`.
    pub fn new(
        command: impl Into<String>,
        max_count: u32,
        max_sides: u32,
        roller: Arc<dyn Roller>,
    ) -> Result<Self, HandlerError> {
        let command = command.into();
        let pattern = Regex::new(&format!(r"{} (\d+)d(\d+)", regex::escape(&command)))
            .map_err(|e| HandlerError::Internal(e.to_string()))?;
        Ok(Self {
            command,
            pattern,
            max_count,
            max_sides,
            roller,
        })
    }

    fn usage(&self) -> String {
        format!(
            "Usage: {c} or {c} XdY (e.g., {c} 2d20)",
            c = self.command
        )
    }

    fn invalid(&self) -> String {
        format!("Invalid dice format! Use {c} or {c} XdY", c = self.command)
    }

    fn too_large(&self) -> String {
        format!(
            "Dice too large! Max {} dice, {} sides.",
            self.max_count, self.max_sides
        )
    }

    /// Reply text for one dice request.
    pub fn roll(&self, sender: &str, text: &str) -> String {
        if text == self.command {
            return format!("{sender} rolled: {}", self.roller.roll(6));
        }

        let Some(caps) = self.pattern.captures(text) else {
            return self.usage();
        };

        // Digits too long to parse are necessarily over the limits.
        let (Ok(count), Ok(sides)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
            return self.too_large();
        };
        if count > self.max_count || sides > self.max_sides {
            return self.too_large();
        }
        if sides == 0 {
            return self.invalid();
        }

        let rolls: Vec<u32> = (0..count).map(|_| self.roller.roll(sides)).collect();
        let total: u64 = rolls.iter().map(|&r| u64::from(r)).sum();
        let shown: Vec<String> = rolls.iter().map(u32::to_string).collect();
        format!(
            "{sender} rolled {count}d{sides}: [{}] (Total: {total})",
            shown.join(", ")
        )
    }
}

#[async_trait]
impl Handler for DiceHandler {
    async fn handle(&self, _ctx: &Context, sender: &str, text: &str) -> HandlerResult {
        Ok(Some(self.roll(sender, text)))
    }
}

const EIGHT_BALL: &[&str] = &[
    "It is certain.",
    "It is decidedly so.",
    "Without a doubt.",
    "Yes, definitely.",
    "You may rely on it.",
    "As I see it, yes.",
    "Most likely.",
    "Outlook good.",
    "Yes.",
    "Signs point to yes.",
    "Reply hazy, try again.",
    "Ask again later.",
    "Better not tell you now.",
    "Cannot predict now.",
    "Concentrate and ask again.",
    "Don't count on it.",
    "My reply is no.",
    "My sources say no.",
    "Outlook not so good.",
    "Very doubtful.",
];

/// `8ball`.
pub struct EightBallHandler {
    roller: Arc<dyn Roller>,
}

impl EightBallHandler {
    pub fn new(roller: Arc<dyn Roller>) -> Self {
        Self { roller }
    }
}

#[async_trait]
impl Handler for EightBallHandler {
    async fn handle(&self, _ctx: &Context, _sender: &str, _text: &str) -> HandlerResult {
        Ok(Some(format!(
            "Magic 8-Ball says: {}",
            pick(self.roller.as_ref(), EIGHT_BALL)
        )))
    }
}

const JOKES: &[&str] = &[
    "Why don't scientists trust atoms? Because they make up everything!",
    "Why did the scarecrow win an award? He was outstanding in his field!",
    "What do you call a fake noodle? An impasta!",
    "Why did the math book look so sad? Because it had too many problems!",
    "What do you call a bear with no teeth? A gummy bear!",
    "Why don't eggs tell jokes? They'd crack each other up!",
    "What do you call a dinosaur that crashes his car? Tyrannosaurus wrecks!",
    "Why did the cookie go to the doctor? Because it was feeling crumbly!",
];

/// `joke`.
pub struct JokeHandler {
    roller: Arc<dyn Roller>,
}

impl JokeHandler {
    pub fn new(roller: Arc<dyn Roller>) -> Self {
        Self { roller }
    }
}

#[async_trait]
impl Handler for JokeHandler {
    async fn handle(&self, _ctx: &Context, _sender: &str, _text: &str) -> HandlerResult {
        Ok(Some(pick(self.roller.as_ref(), JOKES).to_string()))
    }
}
