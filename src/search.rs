/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    marker::PhantomData,
    ops::RangeInclusive,
    time::{Duration, Instant},
};

use anyhow::{bail, Result};

use crate::{
    distance_to_centroid, send_string, Board, LogLevel, Move, Score, Side, VirtualScope,
};

/// Depths (in full rounds) that an [`Engine`] may be configured with.
///
/// Anything deeper takes far too long on a standard board.
pub const SUPPORTED_DEPTHS: RangeInclusive<usize> = 1..=3;

/// Weights of the heuristics used when scoring a move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// Bonus for every king captured.
    ///
    /// The higher it is, the more the engine tries to capture enemy kings and protect its own.
    pub king_capture_value: f64,

    /// Bonus for promoting a piece.
    ///
    /// The higher it is, the more the engine tries to promote its pieces and prevent the enemy from promoting.
    pub promotion_value: f64,

    /// Bonus for leaving the opponent without any legal replies.
    pub no_moves_value: f64,

    /// Divisor applied to the score at every ply.
    ///
    /// Lower values favor long-term outcomes, higher values favor short-term ones.
    pub decay: f64,

    /// Penalty for moving a piece somewhere it has no moves left.
    ///
    /// Anything other than zero makes the engine noticeably weaker, so this doubles as a difficulty knob.
    pub dead_piece_penalty: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            king_capture_value: 1.0,
            promotion_value: 1.0,
            no_moves_value: 8.0,
            decay: 4.0,
            dead_piece_penalty: 0.0,
        }
    }
}

/// Bounds on how much work a single search may do.
///
/// If either limit is exceeded, the deepest round that completed in time is used instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Node allowance.
    pub max_nodes: u64,

    /// Wall-clock allowance, measured from the start of the search.
    pub hard_timeout: Duration,
}

impl SearchLimits {
    /// Returns `true` if these limits never cut a search short.
    #[inline(always)]
    pub fn is_unlimited(&self) -> bool {
        self.max_nodes == u64::MAX && self.hard_timeout == Duration::MAX
    }
}

impl Default for SearchLimits {
    /// A default [`SearchLimits`] never interrupts a search.
    fn default() -> Self {
        Self {
            max_nodes: u64::MAX,
            hard_timeout: Duration::MAX,
        }
    }
}

/// How a single candidate move fared during analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveAnalysis {
    /// Heuristic score of the move, after decay.
    pub score: Score,

    /// Distance from the move's destination to the opponent's centroid, rounded up.
    ///
    /// Smaller distances rank higher when breaking ties.
    pub distance: u64,

    /// Index of the move in the list that was analyzed.
    pub index: usize,
}

/// The result of a search over a list of candidate moves.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// One entry per candidate move, in the order they were given.
    pub analysis: Vec<MoveAnalysis>,

    /// Number of nodes searched, across all rounds.
    pub nodes: u64,

    /// Deepest ply limit that completed, or `0` if none did.
    pub depth: usize,
}

/// Depth-limited negamax evaluator over a list of candidate moves.
///
/// Depth is configured in full rounds and doubled internally, so that evaluation always ends after both sides
/// have replied and never in the middle of a capture chain.
#[derive(Debug, Clone, Copy)]
pub struct Engine<Log> {
    /// Ply limit of the search: twice the configured depth.
    max_depth: usize,

    /// Heuristic weights.
    options: EngineOptions,

    /// Work allowance of a single search.
    limits: SearchLimits,

    /// Marker for the level of logging to print.
    log: PhantomData<Log>,
}

impl<Log: LogLevel> Engine<Log> {
    /// Constructs a new [`Engine`] that searches `depth` full rounds ahead.
    ///
    /// Fails if `depth` is not within [`SUPPORTED_DEPTHS`].
    ///
    /// # Example
    /// ```
    /// # use draughts::{Engine, EngineOptions, LogNone};
    /// assert!(Engine::<LogNone>::new(2, EngineOptions::default()).is_ok());
    /// assert!(Engine::<LogNone>::new(4, EngineOptions::default()).is_err());
    /// ```
    pub fn new(depth: usize, options: EngineOptions) -> Result<Self> {
        if !SUPPORTED_DEPTHS.contains(&depth) {
            bail!(
                "Engine depth must be between {} and {}, got {depth}",
                SUPPORTED_DEPTHS.start(),
                SUPPORTED_DEPTHS.end()
            );
        }
        if options.decay == 0.0 {
            bail!("Engine decay must be non-zero");
        }

        Ok(Self {
            max_depth: depth * 2,
            options,
            limits: SearchLimits::default(),
            log: PhantomData,
        })
    }

    /// Sets the work allowance of every subsequent search.
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Depth of this engine, in full rounds.
    #[inline(always)]
    pub const fn depth(&self) -> usize {
        self.max_depth / 2
    }

    #[inline(always)]
    pub const fn options(&self) -> &EngineOptions {
        &self.options
    }

    #[inline(always)]
    pub const fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    /// Scores every move in `moves`, which must be legal moves for `us`.
    ///
    /// The board is used as scratch space during the search, and is left exactly as it was found.
    pub fn analyze(&self, moves: &[Move], board: &mut Board, us: Side) -> Vec<MoveAnalysis> {
        self.search(moves, board, us).analysis
    }

    /// Searches every move in `moves`, which must be legal moves for `us`.
    ///
    /// Without limits, this is a single search at the configured depth.
    /// With limits, each round is searched in turn (iterative deepening), and the deepest round that completed is kept.
    pub fn search(&self, moves: &[Move], board: &mut Board, us: Side) -> SearchResult {
        let distances = moves
            .iter()
            .map(|mv| distance_to_centroid(board, us.opponent(), mv.end))
            .collect::<Vec<_>>();

        let mut search = Search::<Log>::new(self.options, self.limits);
        let mut scores = vec![Score::ZERO; moves.len()];
        let mut completed = 0;

        let mut depth = if self.limits.is_unlimited() {
            self.max_depth
        } else {
            2
        };

        while depth <= self.max_depth {
            match search.root(board, moves, us, depth) {
                Ok(new_scores) => {
                    scores = new_scores;
                    completed = depth;

                    if Log::DEBUG {
                        let best = scores.iter().copied().max_by(Score::total_cmp);
                        send_string(format!(
                            "depth {depth} nodes {} best {best:?}",
                            search.nodes
                        ));
                    }
                }
                Err(e) => {
                    if Log::DEBUG {
                        send_string(format!("Search cancelled during depth {depth}: {e}"));
                        send_string(format!("Falling back to results from depth {completed}"));
                    }
                    break;
                }
            }

            depth += 2;
        }

        let analysis = scores
            .into_iter()
            .zip(distances)
            .enumerate()
            .map(|(index, (score, distance))| MoveAnalysis {
                score,
                distance,
                index,
            })
            .collect();

        SearchResult {
            analysis,
            nodes: search.nodes,
            depth: completed,
        }
    }
}

/// State of a single search invocation.
struct Search<Log> {
    /// Heuristic weights.
    options: EngineOptions,

    /// Work allowance.
    limits: SearchLimits,

    /// When the search began.
    starttime: Instant,

    /// Number of nodes searched so far.
    nodes: u64,

    /// Marker for the level of logging to print.
    log: PhantomData<Log>,
}

impl<Log: LogLevel> Search<Log> {
    fn new(options: EngineOptions, limits: SearchLimits) -> Self {
        Self {
            options,
            limits,
            starttime: Instant::now(),
            nodes: 0,
            log: PhantomData,
        }
    }

    /// Scores every root move with a ply limit of `max_depth`.
    ///
    /// On error, the board has already been restored by the time this returns.
    fn root(
        &mut self,
        board: &mut Board,
        moves: &[Move],
        us: Side,
        max_depth: usize,
    ) -> Result<Vec<Score>> {
        let mut scope = board.virtual_scope(0);

        moves
            .iter()
            .map(|mv| self.negamax(&mut scope, mv, us, 0, max_depth))
            .collect()
    }

    /// Bails if this search has exhausted its allowance.
    fn check_limits(&self) -> Result<()> {
        if self.nodes >= self.limits.max_nodes {
            let nodes = self.limits.max_nodes;
            bail!("exceeded node allowance of {nodes} nodes");
        }

        if self.limits.hard_timeout != Duration::MAX
            && self.starttime.elapsed() >= self.limits.hard_timeout
        {
            let ms = self.limits.hard_timeout.as_millis();
            bail!("exceeded hard timeout of {ms}ms");
        }

        Ok(())
    }

    /// Primary location of search logic.
    ///
    /// Plays `mv` for `us` one layer deeper than `parent`, scores its immediate effects,
    /// subtracts the scores of every reply while the ply limit allows, and divides the total by the decay.
    /// Everything `mv` changed is restored when this returns, on every path.
    fn negamax(
        &mut self,
        parent: &mut VirtualScope<'_>,
        mv: &Move,
        us: Side,
        depth: usize,
        max_depth: usize,
    ) -> Result<Score> {
        self.check_limits()?;
        self.nodes += 1;

        let mut scope = parent.nested();
        let mut score = Score::ZERO;

        // Simulate the move, following the capture chain to its end
        if mv.is_capture() {
            score += self.capture_chain(&mut scope, mv);
        } else {
            scope.virtual_move(mv.piece, mv.end);
        }

        let replies = scope.legal_moves(us.opponent());

        // Recurse into every reply
        if depth < max_depth {
            for reply in &replies {
                score -= self.negamax(&mut scope, reply, us.opponent(), depth + 1, max_depth)?;
            }
        }

        // Reward leaving the opponent stuck
        if replies.is_empty() {
            score += self.options.no_moves_value;
        }

        // Reward promotion
        let piece = scope.piece(mv.piece);
        if let Some(square) = piece.square() {
            if !piece.is_king() && square.y == us.promotion_row(scope.size()) {
                score += self.options.promotion_value;
            }
        }

        // Penalize pieces that have nowhere left to go
        if scope.legal_moves_for(mv.piece).is_empty() {
            score -= self.options.dead_piece_penalty;
        }

        Ok(score / self.options.decay)
    }

    /// Plays the capture `mv` and every capture that follows it with the same piece.
    ///
    /// Each captured piece is worth `1`, plus the king capture bonus if it was a king.
    /// When a piece could continue the chain in more than one way, the first capture generated is taken.
    fn capture_chain(&self, scope: &mut VirtualScope<'_>, mv: &Move) -> Score {
        let mut score = Score::ZERO;
        let mut next = Some(*mv);

        while let Some(jump) = next {
            if let Some(captured) = jump.captured {
                score += 1.0;
                if scope.piece(captured).is_king() {
                    score += self.options.king_capture_value;
                }
            }

            scope.apply(&jump);
            next = scope.capture_moves_for(mv.piece).first().copied();
        }

        score
    }
}
