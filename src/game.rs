use rand::{rngs::StdRng, seq::IteratorRandom, Rng, SeedableRng};
use strum::IntoEnumIterator;
use tracing::{debug, info};

use crate::card::{Card, CardColor, CardEffect};
use crate::constants::{deck_size, MIN_PLAYERS};
use crate::deck::Deck;
use crate::error::{GameError, Result};
use crate::player::Player;
use crate::turn::TurnOutcome;

pub type PlayerId = usize;

/// Returns true if `candidate` may be placed on `top`: matching color,
/// matching rank between two numeric cards, or a wild. A wild's color is
/// its declared color, so an undeclared wild in a hand never matches by
/// color but is always playable in its own right.
pub fn is_playable(candidate: &Card, top: &Card) -> bool {
    if candidate.is_wild() {
        return true;
    }

    let color_matches = match (candidate.color(), top.color()) {
        (Some(candidate_color), Some(top_color)) => candidate_color == top_color,
        _ => false,
    };

    // rank() is Some only for numeric cards, so this compares digits
    // between two numerics and nothing else.
    let rank_matches = match (candidate.rank(), top.rank()) {
        (Some(candidate_rank), Some(top_rank)) => candidate_rank == top_rank,
        _ => false,
    };

    color_matches || rank_matches
}

/// The turn-resolution state machine. One [`Game::run_one_turn`] call
/// resolves the active player's turn and leaves the next player ready;
/// once a hand empties the game is over and further calls do nothing.
///
/// All randomness (shuffles and wild-color declarations) flows through
/// the injected `rng`, so a seeded source makes a game fully
/// deterministic.
#[derive(Debug)]
pub struct Game<R: Rng = StdRng> {
    deck: Deck,
    players: Vec<Player>,
    current_player: PlayerId,
    winner: Option<PlayerId>,
    rng: R,
}

impl Game<StdRng> {
    /// Sets up a game with an entropy-seeded random source. See
    /// [`Game::with_rng`] for the parameters and failure modes.
    pub fn new(
        player_count: usize,
        initial_hand_size: usize,
        numeric_per_color: usize,
        special_per_color: usize,
        wild_count: usize,
    ) -> Result<Self> {
        Self::with_rng(
            player_count,
            initial_hand_size,
            numeric_per_color,
            special_per_color,
            wild_count,
            StdRng::from_entropy(),
        )
    }
}

impl<R: Rng> Game<R> {
    /// Sets up a game: builds and shuffles the deck, deals
    /// `initial_hand_size` cards to each player and flips the opening
    /// discard. A wild opening card gets a random declared color right
    /// away.
    ///
    /// Fails with [`GameError::InvalidConfiguration`] if fewer than two
    /// players or an empty initial hand is requested, or if the deck is
    /// too small to deal every hand plus the opening discard.
    pub fn with_rng(
        player_count: usize,
        initial_hand_size: usize,
        numeric_per_color: usize,
        special_per_color: usize,
        wild_count: usize,
        mut rng: R,
    ) -> Result<Self> {
        if player_count < MIN_PLAYERS {
            return Err(GameError::InvalidConfiguration(format!(
                "at least {MIN_PLAYERS} players are required, got {player_count}"
            )));
        }
        if initial_hand_size == 0 {
            return Err(GameError::InvalidConfiguration(
                "initial hand size must be at least 1".to_string(),
            ));
        }

        let total_cards = deck_size(numeric_per_color, special_per_color, wild_count);
        let cards_needed = player_count * initial_hand_size + 1;
        if total_cards < cards_needed {
            return Err(GameError::InvalidConfiguration(format!(
                "{total_cards} cards cannot deal {player_count} hands of \
                 {initial_hand_size} plus the opening discard"
            )));
        }

        let mut deck = Deck::new();
        deck.build(numeric_per_color, special_per_color, wild_count, &mut rng)?;

        let mut players = Vec::with_capacity(player_count);
        for i in 0..player_count {
            let mut player = Player::new(format!("Player {}", i + 1));
            for _ in 0..initial_hand_size {
                player.add_to_hand(deck.draw_one()?);
            }
            players.push(player);
        }

        let opening = deck.draw_one()?;
        deck.discard(opening);
        if deck.top_discard()?.is_wild() {
            let color = random_color(&mut rng);
            deck.top_discard_mut()?.declare_color(color);
        }

        info!(
            players = player_count,
            top = %deck.top_discard()?,
            "game started"
        );

        Ok(Self {
            deck,
            players,
            current_player: 0,
            winner: None,
            rng,
        })
    }

    /// Resolves one turn of the active player:
    ///
    /// 1. refreshes the draw pile from the discard history if it is
    ///    empty,
    /// 2. plays the first legal card in hand order, or draws one card
    ///    and plays it immediately when legal, keeping it otherwise,
    /// 3. applies the discarded card's effect to pick the next active
    ///    player.
    ///
    /// Once the game has a winner this is a no-op and reports
    /// [`TurnOutcome::AlreadyOver`].
    pub fn run_one_turn(&mut self) -> Result<TurnOutcome> {
        if let Some(winner) = self.winner {
            return Ok(TurnOutcome::AlreadyOver { winner });
        }

        if self.deck.is_draw_pile_empty() {
            self.deck.refresh(&mut self.rng);
        }

        let player = self.current_player;
        let card_was_played = self.play_matching_card_or_draw()?;

        if !card_was_played {
            self.current_player = self.successor(1);
            return Ok(TurnOutcome::DrewAndKept { player });
        }

        self.apply_top_card_effect()?;
        let card = self.deck.top_discard()?.clone();

        let won = self.players[player].is_hand_empty();
        if won {
            self.winner = Some(player);
            info!(winner = %self.players[player], "game over");
        }

        Ok(TurnOutcome::Played { player, card, won })
    }

    pub fn is_game_over(&self) -> bool {
        self.winner().is_some()
    }

    /// The first player with an empty hand, if any. Idempotent and safe
    /// to call at any point, including after the game has ended.
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
            .or_else(|| self.players.iter().position(Player::is_hand_empty))
    }

    /// The card currently in play.
    pub fn top_discard(&self) -> Result<&Card> {
        self.deck.top_discard()
    }

    pub fn hand_of(&self, player: PlayerId) -> Result<&[Card]> {
        self.players
            .get(player)
            .map(|player| player.hand.as_slice())
            .ok_or(GameError::InvalidPlayer(player))
    }

    pub fn player(&self, player: PlayerId) -> Result<&Player> {
        self.players
            .get(player)
            .ok_or(GameError::InvalidPlayer(player))
    }

    pub fn player_mut(&mut self, player: PlayerId) -> Result<&mut Player> {
        self.players
            .get_mut(player)
            .ok_or(GameError::InvalidPlayer(player))
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Scans the active player's hand in hand order and discards the
    /// first legal card. With no legal card in hand, draws exactly one:
    /// a legal drawn card is discarded immediately, anything else joins
    /// the hand. Returns whether a card ended up on the discard pile.
    fn play_matching_card_or_draw(&mut self) -> Result<bool> {
        let top = self.deck.top_discard()?.clone();
        let player = &mut self.players[self.current_player];

        if let Some(position) = player.hand.iter().position(|card| is_playable(card, &top)) {
            let card = player.remove_card(position)?;
            debug!(player = %player, card = %card, "plays from hand");
            self.deck.discard(card);
            return Ok(true);
        }

        let drawn = self.deck.draw_one()?;
        let player = &mut self.players[self.current_player];
        if is_playable(&drawn, &top) {
            debug!(player = %player, card = %drawn, "plays the drawn card");
            self.deck.discard(drawn);
            Ok(true)
        } else {
            debug!(player = %player, card = %drawn, "draws and keeps");
            player.add_to_hand(drawn);
            Ok(false)
        }
    }

    /// Resolves the effect of the card just discarded and moves the
    /// active-player index accordingly. Reverse redirects only this one
    /// transition; there is no persistent direction state, so ordinary
    /// turns after it resume forward motion.
    fn apply_top_card_effect(&mut self) -> Result<()> {
        let successor = self.successor(1);
        let after_successor = self.successor(2);
        let predecessor = self.predecessor();

        match self.deck.top_discard()?.clone() {
            Card::Wild(declared) => {
                // Declared at most once per card: a recycled wild that
                // already has its color keeps it.
                if declared.is_none() {
                    let color = random_color(&mut self.rng);
                    self.deck.top_discard_mut()?.declare_color(color);
                    debug!(color = %color, "wild color declared");
                }
                self.current_player = successor;
            }
            Card::Special(_, CardEffect::Skip) => {
                self.current_player = after_successor;
            }
            Card::Special(_, CardEffect::Reverse) => {
                self.current_player = predecessor;
            }
            Card::Special(_, CardEffect::DrawTwo) => {
                self.draw_to_player(successor, 2)?;
                self.current_player = after_successor;
            }
            Card::Numeric(_, _) => {
                self.current_player = successor;
            }
        }

        Ok(())
    }

    fn draw_to_player(&mut self, player: PlayerId, count: usize) -> Result<()> {
        for _ in 0..count {
            if self.deck.is_draw_pile_empty() {
                self.deck.refresh(&mut self.rng);
            }
            let card = self.deck.draw_one()?;
            self.players[player].add_to_hand(card);
        }
        Ok(())
    }

    fn successor(&self, steps: usize) -> PlayerId {
        (self.current_player + steps) % self.players.len()
    }

    fn predecessor(&self) -> PlayerId {
        (self.current_player + self.players.len() - 1) % self.players.len()
    }
}

fn random_color(rng: &mut impl Rng) -> CardColor {
    CardColor::iter()
        .choose(rng)
        .expect("the color set is never empty")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(410)
    }

    fn total_cards(game: &Game<StdRng>) -> usize {
        game.deck.draw_count()
            + game.deck.discard_count()
            + game.players.iter().map(Player::cards_count).sum::<usize>()
    }

    #[test]
    fn playable_by_color() {
        let top = Card::Numeric(CardColor::Red, 3);
        assert!(is_playable(&Card::Numeric(CardColor::Red, 7), &top));
        assert!(is_playable(
            &Card::Special(CardColor::Red, CardEffect::Skip),
            &top
        ));
        assert!(!is_playable(&Card::Numeric(CardColor::Blue, 7), &top));
    }

    #[test]
    fn playable_by_rank_only_between_numerics() {
        let top = Card::Numeric(CardColor::Red, 3);
        assert!(is_playable(&Card::Numeric(CardColor::Blue, 3), &top));

        // Two specials of different colors share no rank to match on.
        let special_top = Card::Special(CardColor::Red, CardEffect::Skip);
        assert!(!is_playable(
            &Card::Special(CardColor::Blue, CardEffect::Skip),
            &special_top
        ));
        assert!(!is_playable(
            &Card::Special(CardColor::Blue, CardEffect::Reverse),
            &special_top
        ));
    }

    #[test]
    fn wild_is_always_playable() {
        let top = Card::Numeric(CardColor::Red, 3);
        assert!(is_playable(&Card::wild(), &top));
    }

    #[test]
    fn declared_wild_on_top_matches_by_color() {
        let top = Card::Wild(Some(CardColor::Green));
        assert!(is_playable(&Card::Numeric(CardColor::Green, 0), &top));
        assert!(!is_playable(&Card::Numeric(CardColor::Red, 0), &top));
    }

    #[test]
    fn undeclared_wild_on_top_matches_no_color() {
        let top = Card::wild();
        assert!(!is_playable(&Card::Numeric(CardColor::Red, 0), &top));
        assert!(is_playable(&Card::wild(), &top));
    }

    #[test]
    fn setup_deals_hands_and_flips_the_opening_card() {
        let game = Game::with_rng(4, 7, 1, 1, 0, rng()).unwrap();

        assert_eq!(game.player_count(), 4);
        for player in &game.players {
            assert_eq!(player.cards_count(), 7);
        }
        assert_eq!(game.deck.discard_count(), 1);
        assert_eq!(game.deck.draw_count(), 52 - 4 * 7 - 1);
        assert_eq!(total_cards(&game), 52);
        assert_eq!(game.current_player(), 0);
        assert!(!game.is_game_over());
    }

    #[test]
    fn setup_declares_a_color_for_a_wild_opening_card() {
        // An all-wild deck apart from the mandatory numerics; with one
        // card dealt per player the opening flip is near-certain to be a
        // wild across seeds, but either way the top must carry a color.
        let game = Game::with_rng(2, 1, 1, 0, 120, rng()).unwrap();
        assert!(game.top_discard().unwrap().color().is_some());
    }

    #[test]
    fn setup_rejects_too_few_players() {
        let error = Game::with_rng(1, 7, 1, 1, 0, rng()).unwrap_err();
        assert!(matches!(error, GameError::InvalidConfiguration(_)));
    }

    #[test]
    fn setup_rejects_an_empty_initial_hand() {
        let error = Game::with_rng(4, 0, 1, 1, 0, rng()).unwrap_err();
        assert!(matches!(error, GameError::InvalidConfiguration(_)));
    }

    #[test]
    fn setup_rejects_a_deck_too_small_for_the_deal() {
        // 40 cards cannot cover 4 hands of 30 plus the opening discard.
        let error = Game::with_rng(4, 30, 1, 0, 0, rng()).unwrap_err();
        assert!(matches!(error, GameError::InvalidConfiguration(_)));
    }

    #[test]
    fn setup_rejects_zero_numeric_cards_per_color() {
        let error = Game::with_rng(2, 1, 0, 1, 4, rng()).unwrap_err();
        assert!(matches!(error, GameError::InvalidConfiguration(_)));
    }

    #[test]
    fn turn_with_no_playable_card_draws_and_keeps() {
        let mut game = Game::with_rng(2, 1, 1, 0, 0, rng()).unwrap();
        game.players[0].hand = vec![Card::Numeric(CardColor::Red, 1)];
        game.deck.discard_pile = vec![Card::Numeric(CardColor::Blue, 2)];
        game.deck.draw_pile = vec![Card::Numeric(CardColor::Green, 3)];

        let outcome = game.run_one_turn().unwrap();

        assert_eq!(outcome, TurnOutcome::DrewAndKept { player: 0 });
        assert_eq!(game.players[0].cards_count(), 2);
        assert_eq!(
            game.players[0].hand[1],
            Card::Numeric(CardColor::Green, 3)
        );
        assert_eq!(game.current_player(), 1);
    }

    #[test]
    fn turn_plays_a_legal_drawn_card_immediately() {
        let mut game = Game::with_rng(2, 1, 1, 0, 0, rng()).unwrap();
        game.players[0].hand = vec![Card::Numeric(CardColor::Red, 1)];
        game.deck.discard_pile = vec![Card::Numeric(CardColor::Blue, 2)];
        game.deck.draw_pile = vec![Card::Numeric(CardColor::Blue, 7)];

        let outcome = game.run_one_turn().unwrap();

        assert_eq!(
            outcome,
            TurnOutcome::Played {
                player: 0,
                card: Card::Numeric(CardColor::Blue, 7),
                won: false
            }
        );
        // The drawn card never entered the hand.
        assert_eq!(game.players[0].cards_count(), 1);
        assert_eq!(game.current_player(), 1);
    }

    #[test]
    fn turn_scan_uses_the_first_match_in_hand_order() {
        let mut game = Game::with_rng(2, 1, 1, 0, 0, rng()).unwrap();
        game.deck.discard_pile = vec![Card::Numeric(CardColor::Blue, 2)];
        // Both cards are legal; hand position breaks the tie.
        game.players[0].hand = vec![
            Card::Numeric(CardColor::Blue, 9),
            Card::Numeric(CardColor::Blue, 4),
        ];

        let outcome = game.run_one_turn().unwrap();

        assert_eq!(
            outcome,
            TurnOutcome::Played {
                player: 0,
                card: Card::Numeric(CardColor::Blue, 9),
                won: false
            }
        );
        assert_eq!(game.players[0].hand, vec![Card::Numeric(CardColor::Blue, 4)]);
    }

    #[test]
    fn draw_two_refreshes_mid_draw_when_the_pile_runs_out() {
        let mut game = Game::with_rng(3, 1, 1, 0, 0, rng()).unwrap();
        game.players[0].hand = vec![Card::Special(CardColor::Red, CardEffect::DrawTwo)];
        game.deck.discard_pile = vec![
            Card::Numeric(CardColor::Blue, 5),
            Card::Numeric(CardColor::Red, 2),
        ];
        game.deck.draw_pile = vec![Card::Numeric(CardColor::Green, 3)];

        let before = game.players[1].cards_count();
        game.run_one_turn().unwrap();

        // The second forced draw only exists after a refresh.
        assert_eq!(game.players[1].cards_count(), before + 2);
        assert_eq!(game.current_player(), 2);
        assert_eq!(
            game.top_discard().unwrap(),
            &Card::Special(CardColor::Red, CardEffect::DrawTwo)
        );
    }

    #[test]
    fn turn_refreshes_an_empty_draw_pile_before_scanning() {
        let mut game = Game::with_rng(2, 1, 1, 0, 0, rng()).unwrap();
        game.players[0].hand = vec![Card::Numeric(CardColor::Red, 1)];
        game.deck.discard_pile = vec![
            Card::Numeric(CardColor::Green, 3),
            Card::Numeric(CardColor::Blue, 2),
        ];
        game.deck.draw_pile = vec![];

        game.run_one_turn().unwrap();

        // The buried Green 3 was recycled into the draw pile and the
        // turn was able to draw from it.
        assert_eq!(game.deck.top_discard().unwrap().color(), Some(CardColor::Blue));
        assert_eq!(game.players[0].cards_count(), 2);
    }

    #[test]
    fn recycled_wild_keeps_its_declared_color() {
        let mut game = Game::with_rng(2, 1, 1, 0, 4, rng()).unwrap();
        game.deck.discard_pile = vec![Card::Numeric(CardColor::Blue, 2)];
        // A wild that came back through a refresh still carries the
        // color it was declared with.
        game.players[0].hand = vec![Card::Wild(Some(CardColor::Green))];

        game.run_one_turn().unwrap();

        assert_eq!(
            game.top_discard().unwrap(),
            &Card::Wild(Some(CardColor::Green))
        );
    }

    #[test]
    fn winner_query_scans_for_the_first_empty_hand() {
        let mut game = Game::with_rng(4, 7, 1, 1, 0, rng()).unwrap();
        assert_eq!(game.winner(), None);

        game.players[2].hand.clear();
        assert_eq!(game.winner(), Some(2));
        assert!(game.is_game_over());

        // Idempotent.
        assert_eq!(game.winner(), Some(2));
    }

    #[test]
    fn terminal_state_makes_further_turns_noops() {
        let mut game = Game::with_rng(2, 1, 1, 0, 0, rng()).unwrap();
        game.deck.discard_pile = vec![Card::Numeric(CardColor::Blue, 2)];
        game.players[0].hand = vec![Card::Numeric(CardColor::Blue, 9)];

        let outcome = game.run_one_turn().unwrap();
        assert_eq!(
            outcome,
            TurnOutcome::Played {
                player: 0,
                card: Card::Numeric(CardColor::Blue, 9),
                won: true
            }
        );
        assert_eq!(game.winner(), Some(0));

        let hand_before = game.players[1].hand.clone();
        let draw_before = game.deck.draw_count();

        let outcome = game.run_one_turn().unwrap();
        assert_eq!(outcome, TurnOutcome::AlreadyOver { winner: 0 });
        assert_eq!(game.players[1].hand, hand_before);
        assert_eq!(game.deck.draw_count(), draw_before);
    }

    #[test]
    fn hand_of_rejects_an_unknown_player() {
        let game = Game::with_rng(2, 1, 1, 0, 0, rng()).unwrap();
        let error = game.hand_of(5).unwrap_err();
        assert!(matches!(error, GameError::InvalidPlayer(5)));
    }
}
