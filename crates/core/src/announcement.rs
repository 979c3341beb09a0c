//! Text of the two cached notices: the nearly-sold-out announcement and the
//! featured speaker.

/// Conferences with at most this many seats left are "nearly sold out".
pub const NEARLY_SOLD_OUT_SEATS: i32 = 5;

const ANNOUNCEMENT_PREFIX: &str =
    "Last chance to attend! The following conferences are nearly sold out:";

/// `true` when a conference still has seats, but few of them.
pub fn is_nearly_sold_out(seats_available: i32) -> bool {
    seats_available > 0 && seats_available <= NEARLY_SOLD_OUT_SEATS
}

/// Build the announcement for the given conference names.
///
/// Returns `None` when there is nothing to announce, in which case the cached
/// entry should be removed.
pub fn format_announcement<S: AsRef<str>>(conference_names: &[S]) -> Option<String> {
    if conference_names.is_empty() {
        return None;
    }
    Some(format!("{ANNOUNCEMENT_PREFIX} {}", join_names(conference_names)))
}

/// Build the featured-speaker notice.
///
/// A speaker is featured only when they hold more than one session in the
/// same conference.
pub fn format_featured_speaker<S: AsRef<str>>(speaker: &str, session_names: &[S]) -> Option<String> {
    if session_names.len() < 2 {
        return None;
    }
    Some(format!(
        "Speaker: {speaker} Sessions: {}",
        join_names(session_names)
    ))
}

fn join_names<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}
