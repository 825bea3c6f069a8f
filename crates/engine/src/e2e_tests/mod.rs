//! End-to-end tests driving the full stack against the in-memory adapters.

use std::sync::Arc;

use futures_util::StreamExt;

use sprawl_domain::{
    Ability, AbilitySource, AbilityType, Character, CharacterAbility, Item, ItemAbilityLink,
    ItemType, Npc, ParticipantSource, ParticipantType, RechargeRule, RestType, UserId,
};

use crate::infrastructure::memory::{MemoryChangeFeed, MemoryStore};
use crate::infrastructure::ports::{
    AbilityRepo, ChangeEvent, ChangeFeed, CharacterRepo, EncounterRepo, InventoryRepo, ItemRepo,
    NpcRepo, SystemClock,
};
use crate::session::Session;
use crate::use_cases::abilities::{AbilityError, TakeRest, UseCharge};
use crate::use_cases::encounter::{
    AddParticipant, AdvanceTurn, ApplyHpDelta, CompleteEncounter, CreateEncounter,
    DeleteEncounter, EncounterError, SetInitiative, StartEncounter, UpdateParticipantNotes,
};
use crate::use_cases::inventory::{AddItemToInventory, ToggleEquip};
use crate::use_cases::management::DeleteItem;
use sprawl_domain::GearModifiers;

struct Harness {
    store: Arc<MemoryStore>,
    feed: Arc<MemoryChangeFeed>,
    gm: Session,
    player: Session,
}

impl Harness {
    fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            feed: Arc::new(MemoryChangeFeed::new(32)),
            gm: Session::admin(UserId::new()),
            player: Session::player(UserId::new()),
        }
    }

    fn characters(&self) -> Arc<dyn CharacterRepo> {
        self.store.clone()
    }
    fn npcs(&self) -> Arc<dyn NpcRepo> {
        self.store.clone()
    }
    fn items(&self) -> Arc<dyn ItemRepo> {
        self.store.clone()
    }
    fn inventory(&self) -> Arc<dyn InventoryRepo> {
        self.store.clone()
    }
    fn abilities(&self) -> Arc<dyn AbilityRepo> {
        self.store.clone()
    }
    fn encounters(&self) -> Arc<dyn EncounterRepo> {
        self.store.clone()
    }
    fn feed(&self) -> Arc<dyn ChangeFeed> {
        self.feed.clone()
    }
}

#[tokio::test]
async fn equip_lifecycle_grants_revokes_and_recomputes() {
    let harness = Harness::new();

    let character = Character::new(harness.player.user_id, "Vex", "Netrunner").with_hp(25, 30);
    harness
        .characters()
        .save(&character)
        .await
        .expect("character saved");

    // Two distinct abilities that happen to share a display name: one from
    // the class, one conveyed by the plating while equipped.
    let class_overcharge = Ability::new(
        "Overcharge",
        AbilityType::Action,
        RechargeRule::ShortRest {
            max_charges: 3,
            charges_per_rest: None,
        },
    );
    let item_overcharge = Ability::new(
        "Overcharge",
        AbilityType::Action,
        RechargeRule::Uses { max_charges: 2 },
    );
    harness
        .abilities()
        .save(&class_overcharge)
        .await
        .expect("ability saved");
    harness
        .abilities()
        .save(&item_overcharge)
        .await
        .expect("ability saved");

    let class_grant =
        CharacterAbility::granted(character.id, &class_overcharge, AbilitySource::Class);
    harness
        .abilities()
        .insert_grant(&class_grant)
        .await
        .expect("class grant inserted");

    let plating = Item::new("Subdermal Plating", ItemType::Cyberware)
        .with_modifiers(GearModifiers::new().with_max_hp(10).with_armor_class(2));
    harness.items().save(&plating).await.expect("item saved");
    harness
        .items()
        .save_link(&ItemAbilityLink {
            item_id: plating.id,
            ability_id: item_overcharge.id,
            requires_equipped: true,
        })
        .await
        .expect("link saved");

    let add_item = AddItemToInventory::new(
        harness.characters(),
        harness.items(),
        harness.inventory(),
        harness.abilities(),
    );
    let added = add_item
        .execute(&harness.player, character.id, plating.id, 1)
        .await
        .expect("item added");
    assert!(added.granted.is_empty());

    // Equip: the item ability appears with full charges, stats recompute.
    let toggle = ToggleEquip::new(
        harness.characters(),
        harness.items(),
        harness.inventory(),
        harness.abilities(),
    );
    let equipped = toggle
        .execute(&harness.player, character.id, added.entry.id)
        .await
        .expect("equip succeeds");
    assert_eq!(equipped.granted.len(), 1);
    assert_eq!(equipped.effective.max_hp, 40);
    assert_eq!(equipped.effective.armor_class, 12);

    let sheet = harness
        .characters()
        .get(character.id)
        .await
        .expect("sheet fetch")
        .expect("sheet exists");
    assert_eq!(sheet.max_hp, 40);
    assert_eq!(sheet.current_hp, 25); // never healed retroactively

    // Spend the item grant down and confirm the exhaustion error.
    let item_grant_id = equipped.granted[0];
    let use_charge = UseCharge::new(harness.characters(), harness.abilities());
    for expected_remaining in [1, 0] {
        let spent = use_charge
            .execute(&harness.player, character.id, item_grant_id)
            .await
            .expect("charge spent");
        assert_eq!(spent.remaining, Some(expected_remaining));
    }
    let exhausted = use_charge
        .execute(&harness.player, character.id, item_grant_id)
        .await;
    assert!(matches!(exhausted, Err(AbilityError::NoChargesRemaining)));

    // A long rest refills the class pool but never the uses pool.
    let mut drained_class = class_grant.clone();
    drained_class.current_charges = 0;
    harness
        .abilities()
        .save_grant(&drained_class)
        .await
        .expect("class grant drained");
    let rest = TakeRest::new(harness.characters(), harness.abilities());
    let rested = rest
        .execute(&harness.player, character.id, RestType::Long)
        .await
        .expect("rest applies");
    assert_eq!(rested.restored, vec![(class_grant.id, 3)]);

    // Unequip: exactly the entry-sourced grant goes away; the class grant
    // keeps its charges.
    let unequipped = toggle
        .execute(&harness.player, character.id, added.entry.id)
        .await
        .expect("unequip succeeds");
    assert_eq!(unequipped.revoked, 1);
    let remaining = harness
        .abilities()
        .grants_for_character(character.id)
        .await
        .expect("grants listed");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, class_grant.id);
    assert_eq!(remaining[0].current_charges, 3);

    let sheet = harness
        .characters()
        .get(character.id)
        .await
        .expect("sheet fetch")
        .expect("sheet exists");
    assert_eq!(sheet.max_hp, 30);
    assert_eq!(sheet.armor_class, 10);

    // Re-equip grants a fresh counter; the identically-named class ability
    // does not suppress or duplicate it.
    let reequipped = toggle
        .execute(&harness.player, character.id, added.entry.id)
        .await
        .expect("re-equip succeeds");
    assert_eq!(reequipped.granted.len(), 1);
    let grants = harness
        .abilities()
        .grants_for_character(character.id)
        .await
        .expect("grants listed");
    assert_eq!(grants.len(), 2);
}

#[tokio::test]
async fn encounter_lifecycle_runs_draft_to_completion() {
    let harness = Harness::new();

    let vex = Character::new(harness.player.user_id, "Vex", "Netrunner")
        .with_hp(25, 30)
        .with_initiative_modifier(2);
    harness.characters().save(&vex).await.expect("saved");
    let bruiser = Npc::new("Chrome Bruiser")
        .with_hp(18, 18)
        .with_initiative_modifier(0);
    let drone = Npc::new("Razor Drone")
        .with_hp(8, 8)
        .with_initiative_modifier(3);
    harness.npcs().save(&bruiser).await.expect("saved");
    harness.npcs().save(&drone).await.expect("saved");

    let create = CreateEncounter::new(harness.encounters());
    let encounter = create
        .execute(&harness.gm, "Alley ambush", "Rain-slick rooftops")
        .await
        .expect("draft created");

    let mut events = harness.feed.subscribe(encounter.id);

    let add = AddParticipant::new(
        harness.encounters(),
        harness.characters(),
        harness.npcs(),
        harness.feed(),
    );
    let p_vex = add
        .execute(
            &harness.gm,
            encounter.id,
            ParticipantSource::Character(vex.id),
            ParticipantType::Player,
        )
        .await
        .expect("vex joins");
    let p_bruiser = add
        .execute(
            &harness.gm,
            encounter.id,
            ParticipantSource::Npc(bruiser.id),
            ParticipantType::Enemy,
        )
        .await
        .expect("bruiser joins");
    let p_drone = add
        .execute(
            &harness.gm,
            encounter.id,
            ParticipantSource::Npc(drone.id),
            ParticipantType::Enemy,
        )
        .await
        .expect("drone joins");
    assert_eq!(p_vex.current_hp, 25);
    assert_eq!(p_bruiser.max_hp, 18);

    // Starting before every roll is in fails and leaves the draft intact.
    let start = StartEncounter::new(
        harness.encounters(),
        Arc::new(SystemClock),
        harness.feed(),
    );
    let premature = start.execute(&harness.gm, encounter.id).await;
    assert!(matches!(
        premature,
        Err(EncounterError::IncompleteInitiative { missing: 3 })
    ));

    // Rolls: Vex 15+2=17, Bruiser 18+0=18, Drone 15+3=18.
    // Expected order: Drone (tie on 18, higher modifier), Bruiser, Vex.
    let set = SetInitiative::new(harness.encounters(), harness.feed());
    set.execute(&harness.gm, p_vex.id, 15).await.expect("roll");
    set.execute(&harness.gm, p_bruiser.id, 18)
        .await
        .expect("roll");
    set.execute(&harness.gm, p_drone.id, 15).await.expect("roll");

    let started = start
        .execute(&harness.gm, encounter.id)
        .await
        .expect("start succeeds");
    assert_eq!(started.round_number, 1);
    assert_eq!(started.current_turn, 1);

    let ranked = harness
        .encounters()
        .participants(encounter.id)
        .await
        .expect("participants listed");
    let order_of = |id| {
        ranked
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| p.initiative_order)
    };
    assert_eq!(order_of(p_drone.id), Some(1));
    assert_eq!(order_of(p_bruiser.id), Some(2));
    assert_eq!(order_of(p_vex.id), Some(3));

    // Three participants: two advances reach the last slot, the third wraps.
    let advance = AdvanceTurn::new(harness.encounters(), harness.feed());
    advance.execute(&harness.gm, encounter.id).await.expect("advance");
    let third = advance
        .execute(&harness.gm, encounter.id)
        .await
        .expect("advance");
    assert_eq!(third.current_turn, 3);
    assert_eq!(third.round_number, 1);
    let wrapped = advance
        .execute(&harness.gm, encounter.id)
        .await
        .expect("advance");
    assert_eq!(wrapped.current_turn, 1);
    assert_eq!(wrapped.round_number, 2);

    // Damage past zero floors and mirrors onto the source sheet.
    let hp = ApplyHpDelta::new(
        harness.encounters(),
        harness.characters(),
        harness.npcs(),
        harness.feed(),
    );
    let down = hp
        .execute(&harness.gm, p_vex.id, -999)
        .await
        .expect("damage applies");
    assert_eq!(down.change.new_hp, 0);
    assert!(down.is_down);
    let sheet = harness
        .characters()
        .get(vex.id)
        .await
        .expect("sheet fetch")
        .expect("sheet exists");
    assert_eq!(sheet.current_hp, 0);

    let healed = hp
        .execute(&harness.gm, p_vex.id, 20)
        .await
        .expect("heal applies");
    assert_eq!(healed.change.new_hp, 20);

    // Completion freezes everything but notes.
    let complete = CompleteEncounter::new(
        harness.encounters(),
        Arc::new(SystemClock),
        harness.feed(),
    );
    complete
        .execute(&harness.gm, encounter.id)
        .await
        .expect("completion succeeds");
    let frozen = hp.execute(&harness.gm, p_vex.id, -1).await;
    assert!(matches!(frozen, Err(EncounterError::EncounterCompleted)));
    let notes = UpdateParticipantNotes::new(harness.encounters(), harness.feed());
    notes
        .execute(&harness.gm, p_vex.id, "limped out of the alley")
        .await
        .expect("notes still editable");

    // The feed carried the whole story: roster, rolls, start, turns, HP.
    let mut seen_start = false;
    let mut seen_wrap = false;
    let mut seen_down = false;
    for _ in 0..12 {
        match events.next().await.expect("buffered event") {
            ChangeEvent::EncounterStarted { round_number, .. } => {
                assert_eq!(round_number, 1);
                seen_start = true;
            }
            ChangeEvent::TurnAdvanced {
                round_number: 2,
                current_turn: 1,
                ..
            } => seen_wrap = true,
            ChangeEvent::ParticipantHpChanged {
                is_down: true,
                new_hp,
                ..
            } => {
                assert_eq!(new_hp, 0);
                seen_down = true;
            }
            _ => {}
        }
    }
    assert!(seen_start && seen_wrap && seen_down);

    // Deletion is terminal and removes the roster with the encounter.
    let delete = DeleteEncounter::new(harness.encounters(), harness.feed());
    delete
        .execute(&harness.gm, encounter.id)
        .await
        .expect("deletion succeeds");
    assert!(harness
        .encounters()
        .get(encounter.id)
        .await
        .expect("fetch")
        .is_none());
    assert!(harness
        .encounters()
        .participants(encounter.id)
        .await
        .expect("fetch")
        .is_empty());
}

#[tokio::test]
async fn deleting_an_equipped_item_revokes_through_the_whole_stack() {
    let harness = Harness::new();

    let character = Character::new(harness.player.user_id, "Vex", "Netrunner");
    harness.characters().save(&character).await.expect("saved");
    let visor = Item::new("Optic Visor", ItemType::Cyberware);
    harness.items().save(&visor).await.expect("saved");
    let ping = Ability::new("Echo Ping", AbilityType::Utility, RechargeRule::Infinite);
    harness.abilities().save(&ping).await.expect("saved");
    harness
        .items()
        .save_link(&ItemAbilityLink {
            item_id: visor.id,
            ability_id: ping.id,
            requires_equipped: true,
        })
        .await
        .expect("link saved");

    let add_item = AddItemToInventory::new(
        harness.characters(),
        harness.items(),
        harness.inventory(),
        harness.abilities(),
    );
    let added = add_item
        .execute(&harness.player, character.id, visor.id, 1)
        .await
        .expect("item added");
    let toggle = ToggleEquip::new(
        harness.characters(),
        harness.items(),
        harness.inventory(),
        harness.abilities(),
    );
    toggle
        .execute(&harness.player, character.id, added.entry.id)
        .await
        .expect("equip succeeds");

    let delete_item = DeleteItem::new(harness.items(), harness.inventory(), harness.abilities());
    let cascade = delete_item
        .execute(&harness.gm, visor.id)
        .await
        .expect("cascade completes");
    assert_eq!(cascade.entries_removed, 1);
    assert_eq!(cascade.grants_removed, 1);
    assert_eq!(cascade.links_removed, 1);

    assert!(harness
        .abilities()
        .grants_for_character(character.id)
        .await
        .expect("grants listed")
        .is_empty());
    assert!(harness
        .inventory()
        .list_for_character(character.id)
        .await
        .expect("entries listed")
        .is_empty());
}
