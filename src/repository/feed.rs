//! Change notifications for the cached character list.

use futures::Stream;
use tokio::sync::watch;

use crate::models::Character;

/// Subscription to the cached character list.
///
/// Holds the latest snapshot; each repository write that touches characters
/// publishes a new one. Slow readers skip intermediate snapshots.
#[derive(Debug, Clone)]
pub struct CharacterFeed {
  rx: watch::Receiver<Vec<Character>>,
}

impl CharacterFeed {
  pub(crate) fn new(rx: watch::Receiver<Vec<Character>>) -> Self {
    Self { rx }
  }

  /// Latest snapshot, marking it as seen.
  pub fn snapshot(&mut self) -> Vec<Character> {
    self.rx.borrow_and_update().clone()
  }

  /// Wait for the next snapshot. `None` once the repository is gone.
  pub async fn changed(&mut self) -> Option<Vec<Character>> {
    self.rx.changed().await.ok()?;
    Some(self.snapshot())
  }

  /// Current snapshot followed by every later one.
  pub fn into_stream(self) -> impl Stream<Item = Vec<Character>> {
    futures::stream::unfold((self, true), |(mut feed, first)| async move {
      let next = if first {
        Some(feed.snapshot())
      } else {
        feed.changed().await
      };
      next.map(|characters| (characters, (feed, false)))
    })
  }
}

/// Sending half kept by the repository.
pub(crate) struct FeedPublisher {
  tx: watch::Sender<Vec<Character>>,
}

impl FeedPublisher {
  pub fn new(initial: Vec<Character>) -> Self {
    let (tx, _rx) = watch::channel(initial);
    Self { tx }
  }

  pub fn subscribe(&self) -> CharacterFeed {
    CharacterFeed::new(self.tx.subscribe())
  }

  /// Publish a new snapshot even if nobody is listening.
  pub fn publish(&self, characters: Vec<Character>) {
    self.tx.send_replace(characters);
  }
}
