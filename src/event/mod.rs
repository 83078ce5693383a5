// Leaderboard event distribution
//
// The engine returns plain data; the service publishes it here and
// presentation-side handlers subscribe per game.

pub use bus::{EventBus, DEFAULT_CHANNEL_CAPACITY};
pub use celebration::CelebrationLogger;
pub use events::LeaderboardEvent;
pub use handler::{EventError, LeaderboardEventHandler};
pub use subscription::GameSubscription;

mod bus;
mod celebration;
mod events;
mod handler;
mod subscription;
