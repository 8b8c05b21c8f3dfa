//! Unit tests for combo construction

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::config::ComboConfig;
    use crate::error::PickError;
    use crate::types::{Game, Leg, Market, Side};
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn odds(v: i32) -> AmericanOdds {
        AmericanOdds::new(v).unwrap()
    }

    fn make_game(id: &str) -> Game {
        Game {
            id: id.to_string(),
            league: "NBA".to_string(),
            home_team: "BOS".to_string(),
            away_team: "NYK".to_string(),
            commence_time: Utc.with_ymd_and_hms(2026, 10, 20, 23, 30, 0).unwrap(),
        }
    }

    fn before_tip() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 20, 18, 0, 0).unwrap()
    }

    fn spread(game: &str, side: Side, line: rust_decimal::Decimal) -> Leg {
        Leg::new(game, Market::Spread, side, Some(line), odds(-110)).unwrap()
    }

    fn points_prop(game: &str, side: Side, line: rust_decimal::Decimal) -> Leg {
        let market = Market::PlayerProp {
            player_id: "tatum-0".to_string(),
            stat: "points".to_string(),
        };
        Leg::new(game, market, side, Some(line), odds(-115)).unwrap()
    }

    #[test]
    fn test_combine_no_legs_is_none() {
        assert_eq!(combine_odds(&[]).unwrap(), None);
        assert_eq!(combined_decimal(&[]).unwrap(), None);
    }

    #[test]
    fn test_combine_two_legs() {
        let decimal = combined_decimal(&[odds(-110), odds(120)]).unwrap().unwrap();
        assert!((decimal - dec!(4.2)).abs() < dec!(0.0001));

        let combined = combine_odds(&[odds(-110), odds(120)]).unwrap();
        assert_eq!(combined, Some(odds(320)));
    }

    #[test]
    fn test_combine_single_leg_round_trips() {
        for v in [-150, -110, 100, 120, 250] {
            assert_eq!(combine_odds(&[odds(v)]).unwrap(), Some(odds(v)));
        }
    }

    #[test]
    fn test_combine_standard_juice() {
        assert_eq!(combine_odds(&[odds(-110), odds(-110)]).unwrap(), Some(odds(264)));
        assert_eq!(
            combine_odds(&[odds(-110), odds(-110), odds(-110)]).unwrap(),
            Some(odds(596))
        );
    }

    #[test]
    fn test_combine_heavy_favorites_stay_negative() {
        // 1.1 * 1.1 = 1.21
        let combined = combine_odds(&[odds(-1000), odds(-1000)]).unwrap().unwrap();
        assert_eq!(combined, odds(-476));
        assert!(combined.is_favorite());
    }

    /// Every ordering of `items`
    fn permutations(items: &[AmericanOdds]) -> Vec<Vec<AmericanOdds>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let first = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, first);
                out.push(tail);
            }
        }
        out
    }

    #[test]
    fn test_combine_ignores_leg_order() {
        let sets: [&[i32]; 5] = [
            &[-110, 145, -240, 310],
            // Exact products land on a half: 2.875 (+187.5) and 5.125 (+412.5)
            &[-128, -380, -360],
            &[-228, -128, -100],
            &[-115, -105, 330, -3000],
            &[-1000, -1000, 100],
        ];

        for set in sets {
            let legs: Vec<AmericanOdds> = set.iter().map(|&v| odds(v)).collect();
            let expected = combine_odds(&legs).unwrap();
            for ordering in permutations(&legs) {
                assert_eq!(combine_odds(&ordering).unwrap(), expected, "legs {:?}", ordering);
            }
        }
    }

    #[test]
    fn test_combine_rounds_exact_half_away_from_zero() {
        assert_eq!(
            combine_odds(&[odds(-128), odds(-380), odds(-360)]).unwrap(),
            Some(odds(188))
        );
        assert_eq!(
            combine_odds(&[odds(-228), odds(-128), odds(-100)]).unwrap(),
            Some(odds(413))
        );
        assert_eq!(
            combined_decimal(&[odds(-360), odds(-128), odds(-380)]).unwrap(),
            Some(dec!(2.875))
        );
    }

    #[test]
    fn test_combine_overflow_is_an_error() {
        let huge = odds(i32::MAX);
        assert!(matches!(
            combine_odds(&[huge, huge]),
            Err(PickError::OddsOverflow)
        ));
        assert!(matches!(
            combine_odds(&[huge, huge, huge, huge, huge]),
            Err(PickError::OddsOverflow)
        ));
    }

    #[test]
    fn test_validate_rejects_locked_game() {
        let game = make_game("g1");
        let leg = Leg::moneyline("g1", Side::Home, odds(-150)).unwrap();
        let after_tip = game.commence_time + Duration::minutes(1);

        let result = validate_leg(&[], &leg, &game, after_tip, 8);
        assert_eq!(result, Err(LegRejection::GameLocked));
        assert_eq!(result.unwrap_err().reason(), "This game is locked.");

        // Locks at the exact start time
        assert_eq!(
            validate_leg(&[], &leg, &game, game.commence_time, 8),
            Err(LegRejection::GameLocked)
        );
    }

    #[test]
    fn test_validate_rejects_wrong_game() {
        let game = make_game("g1");
        let leg = Leg::moneyline("g2", Side::Home, odds(-150)).unwrap();
        assert_eq!(
            validate_leg(&[], &leg, &game, before_tip(), 8),
            Err(LegRejection::WrongGame)
        );
    }

    #[test]
    fn test_validate_duplicate_and_both_sides() {
        let game = make_game("g1");
        let existing = vec![spread("g1", Side::Home, dec!(-4.5))];

        let dup = spread("g1", Side::Home, dec!(-4.5));
        assert_eq!(
            validate_leg(&existing, &dup, &game, before_tip(), 8),
            Err(LegRejection::Duplicate)
        );

        let other_side = spread("g1", Side::Away, dec!(4.5));
        let rejection = validate_leg(&existing, &other_side, &game, before_tip(), 8).unwrap_err();
        assert_eq!(rejection, LegRejection::BothSides);
        assert_eq!(rejection.to_string(), "You can't take both sides of the same market.");

        let alt_line = spread("g1", Side::Home, dec!(-6.5));
        assert_eq!(
            validate_leg(&existing, &alt_line, &game, before_tip(), 8),
            Err(LegRejection::MarketTaken)
        );
    }

    #[test]
    fn test_validate_opposing_moneyline_and_spread() {
        let game = make_game("g1");
        let existing = vec![Leg::moneyline("g1", Side::Home, odds(-180)).unwrap()];

        let away_spread = spread("g1", Side::Away, dec!(4.5));
        assert_eq!(
            validate_leg(&existing, &away_spread, &game, before_tip(), 8),
            Err(LegRejection::OpposingTeams)
        );

        let home_spread = spread("g1", Side::Home, dec!(-4.5));
        assert_eq!(validate_leg(&existing, &home_spread, &game, before_tip(), 8), Ok(()));
    }

    #[test]
    fn test_validate_props_on_same_player() {
        let game = make_game("g1");
        let existing = vec![points_prop("g1", Side::Over, dec!(27.5))];

        let under = points_prop("g1", Side::Under, dec!(27.5));
        assert_eq!(
            validate_leg(&existing, &under, &game, before_tip(), 8),
            Err(LegRejection::BothSides)
        );

        let rebounds = Leg::new(
            "g1",
            Market::PlayerProp {
                player_id: "tatum-0".to_string(),
                stat: "rebounds".to_string(),
            },
            Side::Over,
            Some(dec!(8.5)),
            odds(105),
        )
        .unwrap();
        assert_eq!(validate_leg(&existing, &rebounds, &game, before_tip(), 8), Ok(()));
    }

    #[test]
    fn test_same_market_on_other_game_is_fine() {
        let game = make_game("g2");
        let existing = vec![spread("g1", Side::Home, dec!(-4.5))];
        let leg = spread("g2", Side::Away, dec!(4.5));
        assert_eq!(validate_leg(&existing, &leg, &game, before_tip(), 8), Ok(()));
    }

    #[test]
    fn test_builder_enforces_leg_limit() {
        let config = ComboConfig {
            min_legs: 2,
            max_legs: 2,
        };
        let mut combo = ComboBuilder::new(&config);
        let g1 = make_game("g1");
        let g2 = make_game("g2");
        let g3 = make_game("g3");

        combo
            .try_add(Leg::moneyline("g1", Side::Home, odds(-110)).unwrap(), &g1, before_tip())
            .unwrap();
        assert!(!combo.is_complete());
        combo
            .try_add(Leg::moneyline("g2", Side::Away, odds(120)).unwrap(), &g2, before_tip())
            .unwrap();
        assert!(combo.is_complete());

        let third = Leg::moneyline("g3", Side::Home, odds(-105)).unwrap();
        let rejection = combo.try_add(third, &g3, before_tip()).unwrap_err();
        assert_eq!(rejection.reason(), "Combos are limited to 2 legs.");
        assert_eq!(combo.len(), 2);
    }

    #[test]
    fn test_builder_scores_combined_odds() {
        let mut combo = ComboBuilder::new(&ComboConfig::default());
        assert_eq!(combo.score(ScoringScope::Global).unwrap(), None);

        let g1 = make_game("g1");
        let g2 = make_game("g2");
        combo
            .try_add(Leg::moneyline("g1", Side::Home, odds(-110)).unwrap(), &g1, before_tip())
            .unwrap();
        combo
            .try_add(Leg::moneyline("g2", Side::Home, odds(120)).unwrap(), &g2, before_tip())
            .unwrap();

        let global = combo.score(ScoringScope::Global).unwrap().unwrap();
        assert_eq!(global.odds, odds(320));
        assert_eq!(global.tier.level, 8);
        assert_eq!(global.tier.points, 16);

        let group = combo.score(ScoringScope::Group).unwrap().unwrap();
        assert_eq!(group.tier.level, 4);
    }

    #[test]
    fn test_builder_remove() {
        let mut combo = ComboBuilder::new(&ComboConfig::default());
        let g1 = make_game("g1");
        let leg = Leg::moneyline("g1", Side::Home, odds(-110)).unwrap();
        combo.try_add(leg.clone(), &g1, before_tip()).unwrap();

        assert_eq!(combo.remove(3), None);
        assert_eq!(combo.remove(0), Some(leg.clone()));
        assert!(combo.is_empty());

        // Removing a leg frees its market again
        combo.try_add(leg, &g1, before_tip()).unwrap();
        assert_eq!(combo.len(), 1);
    }
}
