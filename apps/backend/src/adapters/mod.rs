//! SeaORM adapters: thin query functions generic over `ConnectionTrait`,
//! returning `DbErr`. The `repos::sea` store maps errors to `DomainError`.

pub mod games_sea;
pub mod memberships_sea;
pub mod players_sea;
pub mod sessions_sea;
