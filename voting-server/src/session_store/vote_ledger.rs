use crate::{errors::vote_error::VoteError, models::voting_session::VotingSession};

/// Returns a copy of `session` with `voter` appended to the tally matching
/// `choice`. The session itself is left untouched so the caller can persist the
/// candidate before committing it.
pub(crate) fn stage_vote(
    session: &VotingSession,
    voter: &str,
    choice: bool,
) -> Result<VotingSession, VoteError> {
    if session.has_voted(voter) {
        return Err(VoteError::AlreadyVoted(voter.to_string()));
    }

    let mut candidate = session.clone();
    if choice {
        candidate.yes_voters.push(voter.to_string());
    } else {
        candidate.no_voters.push(voter.to_string());
    }

    Ok(candidate)
}
