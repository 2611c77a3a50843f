//! Display helper functions for actors

use shared::ActorId;

use crate::state::actor::Actor;

/// Get display name for an actor, e.g. `"Camera 2 (1f0c2a9b)"`
pub fn actor_display_name(actor: &Actor) -> String {
    format!("{} ({})", actor.name, short_id(&actor.id()))
}

/// First eight hex digits of an id
pub fn short_id(id: &ActorId) -> String {
    let simple = id.simple().to_string();
    simple[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ActorType;

    #[test]
    fn test_short_id() {
        let id = ActorId::parse_str("6b29fc40-ca47-1067-b31d-00dd010662da").unwrap();
        assert_eq!(short_id(&id), "6b29fc40");
    }

    #[test]
    fn test_actor_display_name() {
        let actor = Actor::new(ActorType::Camera, "Camera 1");
        let name = actor_display_name(&actor);
        assert!(name.starts_with("Camera 1 ("));
        assert_eq!(name.len(), "Camera 1 ()".len() + 8);
    }
}
