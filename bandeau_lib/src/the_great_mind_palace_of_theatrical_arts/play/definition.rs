use crate::theater::basement::cla::MarqueeSettings;

use super::{
    backstage::pyrotechnics::{Blink, Rainbow, Rotate, Scramble, TeleType},
    scenario::Scenario,
    Effects,
};

/// The two scenarios the programme puts on.
pub struct Play {
    pub opening: Scenario,
    pub interlude: Scenario,
}

pub fn define_play(settings: &MarqueeSettings) -> Play {
    let opening = Scenario::new().with_settle(settings.settle);
    opening.add_effect(Effects::from(Scramble::new(&settings.message, 700)), 1);
    opening.add_effect(
        Effects::from(TeleType::new("Je m'affiche caractère par caractère", 100)),
        1,
    );
    opening.add_effect(Effects::from(Blink::new("Je clignote 10x", 100)), 10);

    let interlude = Scenario::new().with_settle(settings.settle);
    interlude.add_effect(Effects::from(Rainbow::new("Comme c'est joli !", 30)), 1);
    interlude.add_effect(
        Effects::from(Rotate::new("2 tours à droite", 180, 4000, true)),
        2,
    );

    Play { opening, interlude }
}

/// What gets appended to the opening once it is already on stage.
pub fn late_addition() -> Effects {
    Effects::from(Rotate::new("2 tours à gauche", 180, 4000, false))
}
