/// Public questions on a listing
/// 1. ask
/// 2. answer (once per question)
// region:    --- Imports
use super::events::AuctionEvent;
use super::model::{position, Auction, AuctionStatus, QnaEntry};
use super::AuctionError;
use chrono::{DateTime, Utc};
// endregion: --- Imports

fn non_empty(text: &str) -> Result<String, AuctionError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AuctionError::EmptyText);
    }
    Ok(text.to_string())
}

/// 1. Append a question to a live auction
pub fn ask_question(
    auctions: &[Auction],
    auction_id: &str,
    asked_by: &str,
    question: &str,
    now: DateTime<Utc>,
) -> Result<(Vec<Auction>, AuctionEvent), AuctionError> {
    let index = position(auctions, auction_id)?;
    if auctions[index].status != AuctionStatus::Live {
        return Err(AuctionError::NotLive(auctions[index].status));
    }
    let q = non_empty(question)?;

    let mut next = auctions.to_vec();
    let qna = &mut next[index].qna;
    qna.push(QnaEntry {
        q,
        a: None,
        asked_by: asked_by.to_string(),
        asked_at: now,
        answered_at: None,
    });
    let event = AuctionEvent::QuestionAsked {
        auction_id: auction_id.to_string(),
        index: qna.len() - 1,
        timestamp: now,
    };
    Ok((next, event))
}

/// 2. Answer question `question` (its index in the thread)
pub fn answer_question(
    auctions: &[Auction],
    auction_id: &str,
    question: usize,
    answer: &str,
    now: DateTime<Utc>,
) -> Result<(Vec<Auction>, AuctionEvent), AuctionError> {
    let index = position(auctions, auction_id)?;
    let entry = auctions[index]
        .qna
        .get(question)
        .ok_or(AuctionError::QuestionNotFound(question))?;
    if entry.a.is_some() {
        return Err(AuctionError::AlreadyAnswered(question));
    }
    let a = non_empty(answer)?;

    let mut next = auctions.to_vec();
    let entry = &mut next[index].qna[question];
    entry.a = Some(a);
    entry.answered_at = Some(now);

    let event = AuctionEvent::QuestionAnswered {
        auction_id: auction_id.to_string(),
        index: question,
        timestamp: now,
    };
    Ok((next, event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::lifecycle::create_auction;
    use crate::auction::model::NewAuction;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    fn one_auction() -> Vec<Auction> {
        let input = NewAuction {
            seller_name: "Kiran".into(),
            seller_phone: String::new(),
            gold_type: "Bangle".into(),
            purity: "22K".into(),
            weight: 12.0,
            reserve_price: 60_000,
            buy_now_price: None,
            fulfillment_method: "courier".into(),
            location: "Surat".into(),
            vendor_only: false,
            duration_hours: Some(2),
        };
        create_auction(&[], input, t0()).unwrap().0
    }

    #[test]
    fn ask_then_answer_once() {
        let auctions = one_auction();
        let id = auctions[0].id.clone();

        let (auctions, event) = ask_question(&auctions, &id, "u1", " Hallmarked? ", t0()).unwrap();
        assert!(matches!(event, AuctionEvent::QuestionAsked { index: 0, .. }));
        assert_eq!(auctions[0].qna[0].q, "Hallmarked?");

        let later = t0() + chrono::Duration::minutes(3);
        let (auctions, _) = answer_question(&auctions, &id, 0, "Yes, BIS", later).unwrap();
        assert_eq!(auctions[0].qna[0].a.as_deref(), Some("Yes, BIS"));
        assert_eq!(auctions[0].qna[0].answered_at, Some(later));

        assert!(matches!(
            answer_question(&auctions, &id, 0, "again", later),
            Err(AuctionError::AlreadyAnswered(0))
        ));
    }

    #[test]
    fn empty_text_and_unknown_index_are_rejected() {
        let auctions = one_auction();
        let id = auctions[0].id.clone();
        assert!(matches!(
            ask_question(&auctions, &id, "u1", "   ", t0()),
            Err(AuctionError::EmptyText)
        ));

        let (auctions, _) = ask_question(&auctions, &id, "u1", "Weight?", t0()).unwrap();
        assert!(matches!(
            answer_question(&auctions, &id, 0, "", t0()),
            Err(AuctionError::EmptyText)
        ));
        assert!(matches!(
            answer_question(&auctions, &id, 3, "12g", t0()),
            Err(AuctionError::QuestionNotFound(3))
        ));
    }

    #[test]
    fn closed_auction_takes_no_questions() {
        let mut auctions = one_auction();
        auctions[0].status = AuctionStatus::Closed;
        let id = auctions[0].id.clone();
        assert!(matches!(
            ask_question(&auctions, &id, "u1", "Still available?", t0()),
            Err(AuctionError::NotLive(AuctionStatus::Closed))
        ));
    }
}
