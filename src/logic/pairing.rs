//! Swiss pairing: bye assignment and greedy rematch-avoiding pairing.

use crate::ids::IdGenerator;
use crate::logic::standings::sort_standings;
use crate::models::{Exhaustion, Match, Participant, ParticipantId, Round, TournamentError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Who has met whom, and who has had a bye, across all prior rounds and the
/// participants' own opponent records.
struct History {
    pairs: HashSet<(ParticipantId, ParticipantId)>,
    byes: HashSet<ParticipantId>,
}

impl History {
    fn new(rounds: &[Round], participants: &[Participant]) -> Self {
        let mut history = Self {
            pairs: HashSet::new(),
            byes: HashSet::new(),
        };
        for round in rounds {
            if let Some(id) = round.bye {
                history.byes.insert(id);
            }
            for m in &round.matches {
                match m.player_two {
                    Some(two) => {
                        history.pairs.insert(pair_key(m.player_one, two));
                    }
                    None => {
                        history.byes.insert(m.player_one);
                    }
                }
            }
        }
        for p in participants {
            if p.had_bye() {
                history.byes.insert(p.id);
            }
            for opponent in p.real_opponents() {
                history.pairs.insert(pair_key(p.id, opponent));
            }
        }
        history
    }

    fn have_met(&self, a: ParticipantId, b: ParticipantId) -> bool {
        self.pairs.contains(&pair_key(a, b))
    }

    fn had_bye(&self, id: ParticipantId) -> bool {
        self.byes.contains(&id)
    }
}

fn pair_key(a: ParticipantId, b: ParticipantId) -> (ParticipantId, ParticipantId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Which of `a` and `b` is the closer opponent for `from`: smaller point gap
/// first, then tiebreak1 gap, then tiebreak2 gap.
fn closer(from: &Participant, a: &Participant, b: &Participant) -> Ordering {
    let gap = |x: f64, y: f64| (x - y).abs();
    gap(from.points, a.points)
        .total_cmp(&gap(from.points, b.points))
        .then_with(|| gap(from.tiebreak1, a.tiebreak1).total_cmp(&gap(from.tiebreak1, b.tiebreak1)))
        .then_with(|| gap(from.tiebreak2, a.tiebreak2).total_cmp(&gap(from.tiebreak2, b.tiebreak2)))
}

/// Generate the next round from the prior rounds and the current participants.
///
/// 1. Dropped participants are excluded; at least 2 must remain.
/// 2. Round 1 is paired in random order, later rounds in standings order.
/// 3. With an odd headcount the lowest-placed participant without a bye sits out
///    and gets a completed bye match.
/// 4. The rest are paired greedily: the participant with the fewest opponents
///    left to face goes first and takes the closest one.
///
/// Participants' tiebreaks must be current (see [`crate::refresh_standings`]).
pub fn generate_round<R, G>(
    prior_rounds: &[Round],
    participants: &[Participant],
    rng: &mut R,
    ids: &mut G,
) -> Result<Round, TournamentError>
where
    R: Rng + ?Sized,
    G: IdGenerator + ?Sized,
{
    let number = prior_rounds.len() as u32 + 1;

    let mut pool: Vec<Participant> = participants.iter().filter(|p| p.is_active()).cloned().collect();
    if pool.len() < 2 {
        return Err(TournamentError::InsufficientParticipants { active: pool.len() });
    }

    if number == 1 {
        pool.shuffle(rng);
    } else {
        pool = sort_standings(&pool);
    }

    let history = History::new(prior_rounds, participants);

    let bye = if pool.len() % 2 == 1 {
        let idx = pool
            .iter()
            .rposition(|p| !history.had_bye(p.id))
            .ok_or(TournamentError::PairingExhausted(Exhaustion::NoByeCandidate))?;
        Some(pool.remove(idx))
    } else {
        None
    };

    let pairs = pair_pool(&pool, &history)?;

    let round_id = ids.next_id();
    let mut matches: Vec<Match> = pairs
        .into_iter()
        .map(|(i, j)| {
            log::debug!("round {}: {} vs {}", number, pool[i].name, pool[j].name);
            Match::new(ids.next_id(), number, pool[i].id, pool[j].id)
        })
        .collect();
    if let Some(p) = &bye {
        log::debug!("round {}: bye to {}", number, p.name);
        matches.push(Match::bye(ids.next_id(), number, p.id));
    }

    Ok(Round {
        id: round_id,
        number,
        matches,
        bye: bye.map(|p| p.id),
    })
}

/// Pair an even pool, returning index pairs into `pool`.
fn pair_pool(pool: &[Participant], history: &History) -> Result<Vec<(usize, usize)>, TournamentError> {
    let n = pool.len();
    let mut viable: Vec<Vec<usize>> = (0..n)
        .map(|i| {
            let mut options: Vec<usize> = (0..n)
                .filter(|&j| j != i && !history.have_met(pool[i].id, pool[j].id))
                .collect();
            options.sort_by(|&a, &b| closer(&pool[i], &pool[a], &pool[b]));
            options
        })
        .collect();
    let mut unpaired = vec![true; n];
    let mut pairs = Vec::with_capacity(n / 2);

    // min_by_key keeps the first minimum, so equal counts fall back to pool order.
    loop {
        let Some(i) = (0..n).filter(|&i| unpaired[i]).min_by_key(|&i| viable[i].len()) else {
            break;
        };
        let j = *viable[i]
            .first()
            .ok_or(TournamentError::PairingExhausted(Exhaustion::NoViableOpponent(pool[i].id)))?;
        unpaired[i] = false;
        unpaired[j] = false;
        for options in viable.iter_mut() {
            options.retain(|&k| k != i && k != j);
        }
        pairs.push((i, j));
    }

    Ok(pairs)
}
