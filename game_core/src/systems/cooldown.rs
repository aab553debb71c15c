use crate::{Events, GameEvent, Paddle, PlayerModifiers};
use hecs::World;

/// Poll every player's cooldown and report the ones that just became ready
pub fn poll_cooldowns(world: &mut World, now: u64, events: &mut Events) {
    let mut ready = Vec::new();
    for (_entity, (paddle, modifiers)) in world.query_mut::<(&Paddle, &mut PlayerModifiers)>() {
        if modifiers.in_cooldown && modifiers.cooldown_elapsed(now) {
            ready.push(paddle.player);
        }
    }

    // Deterministic order regardless of entity layout
    ready.sort();
    for player in ready {
        events.push(GameEvent::SkillReady { player });
    }
}
