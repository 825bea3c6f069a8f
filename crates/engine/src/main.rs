//! Sprawl Engine - demo entry point.
//!
//! Wires the in-memory adapters and drives one encounter end to end so the
//! whole stack can be exercised without a hosted backend.

use std::sync::Arc;

use futures_util::StreamExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sprawl_domain::{
    Ability, AbilityType, Character, GearModifiers, Item, ItemAbilityLink, ItemType, Npc,
    ParticipantSource, ParticipantType, RechargeRule, UserId,
};
use sprawl_engine::infrastructure::config::EngineConfig;
use sprawl_engine::infrastructure::memory::{MemoryChangeFeed, MemoryStore};
use sprawl_engine::infrastructure::ports::{
    AbilityRepo, ChangeFeed, CharacterRepo, EncounterRepo, InventoryRepo, ItemRepo, NpcRepo,
    SystemClock,
};
use sprawl_engine::use_cases::abilities::UseCharge;
use sprawl_engine::use_cases::encounter::{
    AddParticipant, AdvanceTurn, ApplyHpDelta, CompleteEncounter, CreateEncounter, SetInitiative,
    StartEncounter,
};
use sprawl_engine::use_cases::inventory::{AddItemToInventory, ToggleEquip};
use sprawl_engine::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from the repo root when present.
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sprawl_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Sprawl Engine demo");
    let config = EngineConfig::from_env();

    let store = Arc::new(MemoryStore::new());
    let feed = Arc::new(MemoryChangeFeed::new(config.change_feed_capacity));
    let clock = Arc::new(SystemClock);

    let characters: Arc<dyn CharacterRepo> = store.clone();
    let npcs: Arc<dyn NpcRepo> = store.clone();
    let items: Arc<dyn ItemRepo> = store.clone();
    let inventory: Arc<dyn InventoryRepo> = store.clone();
    let abilities: Arc<dyn AbilityRepo> = store.clone();
    let encounters: Arc<dyn EncounterRepo> = store.clone();
    let feed_port: Arc<dyn ChangeFeed> = feed.clone();

    let gm = Session::admin(UserId::new());
    let player = Session::player(UserId::new());

    // Seed a character, some chrome, and an opposing drone.
    let vex = Character::new(player.user_id, "Vex", "Netrunner")
        .with_hp(25, 30)
        .with_initiative_modifier(2);
    characters.save(&vex).await?;
    let drone = Npc::new("Razor Drone")
        .with_hp(8, 8)
        .with_initiative_modifier(3);
    npcs.save(&drone).await?;

    let overcharge = Ability::new(
        "Overcharge",
        AbilityType::Action,
        RechargeRule::Uses { max_charges: 2 },
    )
    .with_effect("Dump the capacitor bank into your next strike");
    abilities.save(&overcharge).await?;
    let plating = Item::new("Subdermal Plating", ItemType::Cyberware)
        .with_modifiers(GearModifiers::new().with_max_hp(10).with_armor_class(2));
    items.save(&plating).await?;
    items
        .save_link(&ItemAbilityLink {
            item_id: plating.id,
            ability_id: overcharge.id,
            requires_equipped: true,
        })
        .await?;

    // Acquire and equip the plating; the equip grants Overcharge.
    let add_item = AddItemToInventory::new(
        characters.clone(),
        items.clone(),
        inventory.clone(),
        abilities.clone(),
    );
    let added = add_item.execute(&player, vex.id, plating.id, 1).await?;
    let toggle = ToggleEquip::new(
        characters.clone(),
        items.clone(),
        inventory.clone(),
        abilities.clone(),
    );
    let equipped = toggle.execute(&player, vex.id, added.entry.id).await?;
    tracing::info!(
        max_hp = equipped.effective.max_hp,
        armor_class = equipped.effective.armor_class,
        granted = equipped.granted.len(),
        "plating equipped"
    );

    // Draft the encounter and watch its feed like a player client would.
    let create = CreateEncounter::new(encounters.clone());
    let encounter = create
        .execute(&gm, "Alley ambush", "Rain-slick rooftops")
        .await?;
    let mut events = feed.subscribe(encounter.id);
    let watcher = tokio::spawn(async move {
        while let Some(event) = events.next().await {
            let payload = serde_json::to_string(&event).unwrap_or_default();
            tracing::info!(%payload, "tracker update");
        }
    });

    let add = AddParticipant::new(
        encounters.clone(),
        characters.clone(),
        npcs.clone(),
        feed_port.clone(),
    );
    let p_vex = add
        .execute(
            &gm,
            encounter.id,
            ParticipantSource::Character(vex.id),
            ParticipantType::Player,
        )
        .await?;
    let p_drone = add
        .execute(
            &gm,
            encounter.id,
            ParticipantSource::Npc(drone.id),
            ParticipantType::Enemy,
        )
        .await?;

    let set = SetInitiative::new(encounters.clone(), feed_port.clone());
    set.execute(&gm, p_vex.id, 15).await?;
    set.execute(&gm, p_drone.id, 12).await?;

    let start = StartEncounter::new(encounters.clone(), clock.clone(), feed_port.clone());
    let started = start.execute(&gm, encounter.id).await?;
    tracing::info!(round = started.round_number, "encounter started");

    // One full round: Vex overcharges, the drone takes the hit, turns wrap.
    let use_charge = UseCharge::new(characters.clone(), abilities.clone());
    let spent = use_charge.execute(&player, vex.id, equipped.granted[0]).await?;
    tracing::info!(remaining = ?spent.remaining, "overcharge spent");

    let hp = ApplyHpDelta::new(
        encounters.clone(),
        characters.clone(),
        npcs.clone(),
        feed_port.clone(),
    );
    let hit = hp.execute(&gm, p_drone.id, -6).await?;
    tracing::info!(new_hp = hit.change.new_hp, down = hit.is_down, "drone damaged");

    let advance = AdvanceTurn::new(encounters.clone(), feed_port.clone());
    for _ in 0..2 {
        let position = advance.execute(&gm, encounter.id).await?;
        tracing::info!(
            round = position.round_number,
            turn = position.current_turn,
            "turn advanced"
        );
    }

    let complete = CompleteEncounter::new(encounters.clone(), clock, feed_port);
    complete.execute(&gm, encounter.id).await?;
    tracing::info!("encounter completed");

    watcher.abort();
    Ok(())
}
