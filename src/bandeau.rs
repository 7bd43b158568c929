use bl::log::{info, warn};
use bl::the_great_mind_palace_of_theatrical_arts::basement::cla::MarqueeSettings;
use bl::the_great_mind_palace_of_theatrical_arts::basement::logging::register_logger;
use bl::the_great_mind_palace_of_theatrical_arts::play::definition::{define_play, late_addition};
use bl::{Banner, Interrupter, Outcome, Playback};
use bandeau_lib as bl;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    register_logger();
    let settings = MarqueeSettings::new();
    let play = define_play(&settings);

    let b1 = Banner::new("b1");
    let b2 = Banner::new("b2");
    info!("CTRL+C to stop");

    // the same scenario on two banners at once, and two scenarios fighting over b1
    let playbacks = vec![
        play.opening.play_on(&b1),
        play.interlude.play_on(&b1),
        play.opening.play_on(&b2),
    ];
    let interrupters: Vec<Interrupter> = playbacks.iter().map(Playback::interrupter).collect();

    let late = {
        let opening = play.opening.clone();
        let delay = settings.late_add;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            info!("adding the late effect");
            opening.add_effect(late_addition(), 2);
            info!("late effect added, playbacks that already started won't see it");
        })
    };

    let mut finale = tokio::task::spawn_blocking(move || {
        playbacks
            .into_iter()
            .map(|playback| (playback.id(), playback.join()))
            .collect::<Vec<_>>()
    });

    let results = tokio::select! {
        joined = &mut finale => joined?,
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupting every playback");
            for interrupter in &interrupters {
                interrupter.interrupt();
            }
            finale.await?
        }
    };
    late.abort();

    for (id, result) in results {
        match result {
            Ok(Outcome::Completed { plays }) => info!("{} completed, {} plays", id, plays),
            Ok(Outcome::Abandoned) => warn!("{} was abandoned", id),
            Err(e) => warn!("{}", e),
        }
    }
    Ok(())
}
