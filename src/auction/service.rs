// region:    --- Imports
use super::events::AuctionEvent;
use super::lifecycle;
use super::model::{position, Auction, NewAuction, PublicAuction};
use super::qna;
use super::AuctionError;
use crate::bidding::commands::{self, BuyNowCommand, PlaceBidCommand};
use crate::clock::Clock;
use crate::error::AppError;
use crate::store::{self, KvStore, GOLD_AUCTIONS};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

// endregion: --- Imports

// region:    --- Auction Service
/// Auction collection stored as one value under `gold_auctions`
///
/// Each command:
/// 1. takes the write lock
/// 2. loads the whole collection
/// 3. applies one pure transition
/// 4. writes the collection back if it changed
///
/// The lock only serializes writers inside this process; separate instances
/// sharing the store still race with last-writer-wins.
pub struct AuctionService {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

fn find(auctions: &[Auction], auction_id: &str) -> Result<Auction, AuctionError> {
    position(auctions, auction_id).map(|index| auctions[index].clone())
}

fn log_event(event: &AuctionEvent) {
    match event {
        AuctionEvent::AuctionCreated { auction_id, ends_at } => {
            info!("{:<12} --> auction created id: {}, ends: {}", "Command", auction_id, ends_at)
        }
        AuctionEvent::BidPlaced {
            auction_id,
            bidder_id,
            bid_amount,
            extended_to,
            ..
        } => {
            info!(
                "{:<12} --> bid placed id: {}, bidder: {}, amount: {}",
                "Command", auction_id, bidder_id, bid_amount
            );
            if let Some(ends_at) = extended_to {
                info!("{:<12} --> anti-snipe extension id: {}, ends: {}", "Command", auction_id, ends_at);
            }
        }
        AuctionEvent::BuyNowExecuted {
            auction_id,
            buyer_id,
            price,
            ..
        } => info!(
            "{:<12} --> buy now id: {}, buyer: {}, price: {}",
            "Command", auction_id, buyer_id, price
        ),
        AuctionEvent::AuctionClosed {
            auction_id,
            winner_id,
            price,
            ..
        } => info!(
            "{:<12} --> auction closed id: {}, winner: {}, price: {}",
            "Scheduler", auction_id, winner_id, price
        ),
        AuctionEvent::ReserveNotMet {
            auction_id,
            highest_bid,
            ..
        } => info!(
            "{:<12} --> reserve not met id: {}, highest: {:?}",
            "Scheduler", auction_id, highest_bid
        ),
        AuctionEvent::QuestionAsked { auction_id, index, .. } => {
            info!("{:<12} --> question #{} on {}", "Command", index, auction_id)
        }
        AuctionEvent::QuestionAnswered { auction_id, index, .. } => {
            info!("{:<12} --> answer to #{} on {}", "Command", index, auction_id)
        }
    }
}

impl AuctionService {
    pub fn new(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<Auction>, AppError> {
        Ok(store::load(self.store.as_ref(), GOLD_AUCTIONS).await?)
    }

    /// Read-modify-write of the whole collection under the write lock
    async fn transact<R>(
        &self,
        f: impl FnOnce(&[Auction], DateTime<Utc>) -> Result<(Vec<Auction>, R), AuctionError>,
    ) -> Result<R, AppError> {
        let _guard = self.write_lock.lock().await;
        let current = self.load().await?;
        let (next, out) = f(&current, self.clock.now())?;
        if next != current {
            store::save(self.store.as_ref(), GOLD_AUCTIONS, &next).await?;
        }
        Ok(out)
    }

    // region:    --- Commands
    pub async fn create(&self, input: NewAuction) -> Result<Auction, AppError> {
        self.transact(|auctions, now| {
            let (next, event) = lifecycle::create_auction(auctions, input, now)?;
            log_event(&event);
            let created = find(&next, event.auction_id())?;
            Ok((next, created))
        })
        .await
    }

    pub async fn place_bid(
        &self,
        auction_id: &str,
        cmd: PlaceBidCommand,
    ) -> Result<Auction, AppError> {
        self.transact(|auctions, now| {
            let (next, event) = commands::place_bid(auctions, auction_id, &cmd, now)?;
            log_event(&event);
            let updated = find(&next, auction_id)?;
            Ok((next, updated))
        })
        .await
    }

    pub async fn buy_now(&self, auction_id: &str, cmd: BuyNowCommand) -> Result<Auction, AppError> {
        self.transact(|auctions, now| {
            let (next, event) = commands::buy_now(auctions, auction_id, &cmd, now)?;
            let event = event.ok_or(AuctionError::BuyNowUnavailable)?;
            log_event(&event);
            let updated = find(&next, auction_id)?;
            Ok((next, updated))
        })
        .await
    }

    pub async fn ask_question(
        &self,
        auction_id: &str,
        asked_by: &str,
        question: &str,
    ) -> Result<Auction, AppError> {
        self.transact(|auctions, now| {
            let (next, event) = qna::ask_question(auctions, auction_id, asked_by, question, now)?;
            log_event(&event);
            let updated = find(&next, auction_id)?;
            Ok((next, updated))
        })
        .await
    }

    pub async fn answer_question(
        &self,
        auction_id: &str,
        index: usize,
        answer: &str,
    ) -> Result<Auction, AppError> {
        self.transact(|auctions, now| {
            let (next, event) = qna::answer_question(auctions, auction_id, index, answer, now)?;
            log_event(&event);
            let updated = find(&next, auction_id)?;
            Ok((next, updated))
        })
        .await
    }

    /// Resolves every expired live auction; returns what changed
    pub async fn sweep_expired(&self) -> Result<Vec<AuctionEvent>, AppError> {
        self.transact(|auctions, now| {
            let (next, events) = lifecycle::sweep_expired(auctions, now);
            events.iter().for_each(log_event);
            Ok((next, events))
        })
        .await
    }
    // endregion: --- Commands

    // region:    --- Queries
    pub async fn list(&self) -> Result<Vec<PublicAuction>, AppError> {
        let auctions = self.load().await?;
        Ok(auctions.iter().map(PublicAuction::from).collect())
    }

    /// Full record, reserve included
    pub async fn get(&self, auction_id: &str) -> Result<Auction, AppError> {
        let auctions = self.load().await?;
        Ok(find(&auctions, auction_id)?)
    }
    // endregion: --- Queries
}
// endregion: --- Auction Service
