//! Property-based tests for framing and parsing.
//!
//! 1. Line framing does not depend on how the byte stream is chunked
//! 2. Parsing never panics on arbitrary text
//! 3. Channel messages parse back to their sender, target, and body

use proptest::prelude::*;
use slircbot_proto::{LineFramer, Message};

/// Line content without terminators.
fn line_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[^\r\n]{0,80}").expect("valid regex")
}

fn nickname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z\\[\\]\\\\^_`{|}][a-zA-Z0-9\\-\\[\\]\\\\^_`{|}]{0,8}")
        .expect("valid regex")
}

fn channel_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("#[a-zA-Z0-9_\\-]{1,20}").expect("valid regex")
}

fn body_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[^\r\n\0]{0,200}").expect("valid regex")
}

fn frame_all(stream: &[u8], cuts: &[usize]) -> Vec<String> {
    let mut framer = LineFramer::new();
    let mut out = Vec::new();
    let mut start = 0;
    for &cut in cuts.iter().chain(std::iter::once(&stream.len())) {
        let end = cut.clamp(start, stream.len());
        out.extend(framer.feed(&stream[start..end]).map(|r| r.expect("line within limit")));
        start = end;
    }
    out
}

proptest! {
    #[test]
    fn framing_is_chunk_independent(
        lines in prop::collection::vec(line_strategy(), 0..20),
        crlf in any::<bool>(),
        mut cuts in prop::collection::vec(0usize..2000, 0..10),
    ) {
        let terminator: &[u8] = if crlf { b"\r\n" } else { b"\n" };
        let mut stream = Vec::new();
        for line in &lines {
            stream.extend_from_slice(line.as_bytes());
            stream.extend_from_slice(terminator);
        }
        cuts.sort_unstable();

        let whole = frame_all(&stream, &[]);
        let chunked = frame_all(&stream, &cuts);
        prop_assert_eq!(&whole, &lines);
        prop_assert_eq!(chunked, whole);
    }

    #[test]
    fn parse_never_panics(line in "\\PC{0,200}") {
        let _ = Message::parse(&line);
    }

    #[test]
    fn channel_message_fields_survive(
        nick in nickname_strategy(),
        chan in channel_strategy(),
        body in body_strategy(),
    ) {
        let line = format!(":{}!user@host PRIVMSG {} :{}", nick, chan, body);
        let msg = Message::parse(&line).expect("well-formed line");
        prop_assert_eq!(msg.source_name(), Some(nick.as_str()));
        prop_assert_eq!(msg.privmsg(), Some((chan.as_str(), body.as_str())));
    }
}
