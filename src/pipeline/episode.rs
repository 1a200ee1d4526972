//! Single-episode driver

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    config::AlgorithmMode,
    easy21::{Action, Environment, Outcome, State, Transition},
    learning::Agent,
    ports::Observer,
};

/// Whether an episode feeds its transitions to the learning engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeMode {
    Learn,
    Evaluate,
}

/// Summary of one finished episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub episode: usize,
    pub initial_state: State,
    pub final_state: State,
    pub steps: usize,
    pub outcome: Outcome,
    /// Reward of the terminal step
    pub reward: f64,
    /// Sum of all rewards in the episode
    pub total_reward: f64,
    pub dealer_final: i32,
    /// Value table entries written during the episode
    pub updates: usize,
}

/// Play one episode from a fresh deal to a terminal state.
///
/// Q-learning updates before the next action is chosen so the choice sees
/// the new estimate; n-step TD chooses first because its update bootstraps
/// from that choice.
pub fn play_episode(
    agent: &mut Agent,
    env: &mut Environment,
    mode: EpisodeMode,
    episode: usize,
    observers: &mut [Box<dyn Observer>],
) -> Result<EpisodeReport> {
    let initial_state = agent.reset_episode(env);
    for observer in observers.iter_mut() {
        observer.on_episode_start(episode)?;
    }

    let mut state = initial_state;
    let mut action = agent.select_action(&state);
    let mut steps = 0;
    let mut total_reward = 0.0;
    let mut updates = 0;

    loop {
        let transition = env.step(&state, action);
        for observer in observers.iter_mut() {
            observer.on_step(episode, steps, &state, action, &transition)?;
        }
        steps += 1;
        total_reward += transition.reward;

        let next_action = match mode {
            EpisodeMode::Evaluate => next_action_for(agent, &transition),
            EpisodeMode::Learn => {
                agent.record_transition(state, action, transition.reward);
                match agent.config().algorithm {
                    AlgorithmMode::QLearning => {
                        updates += agent.apply_update(&transition, None)?;
                        next_action_for(agent, &transition)
                    }
                    AlgorithmMode::NStepTd => {
                        let next_action = next_action_for(agent, &transition);
                        updates += agent.apply_update(&transition, next_action)?;
                        next_action
                    }
                }
            }
        };

        let Some(outcome) = transition.outcome else {
            state = transition.state;
            action = next_action.ok_or(Error::MissingNextAction)?;
            continue;
        };

        return Ok(EpisodeReport {
            episode,
            initial_state,
            final_state: transition.state,
            steps,
            outcome,
            reward: transition.reward,
            total_reward,
            dealer_final: transition.dealer_final,
            updates,
        });
    }
}

fn next_action_for(agent: &mut Agent, transition: &Transition) -> Option<Action> {
    if transition.is_terminal() {
        None
    } else {
        Some(agent.select_action(&transition.state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AgentConfig, Rewards};

    #[test]
    fn test_episode_ends_terminal() {
        let mut agent = Agent::new(AgentConfig::default().with_seed(3)).unwrap();
        let mut env = Environment::new(Rewards::default()).with_seed(4);
        for episode in 0..50 {
            let report =
                play_episode(&mut agent, &mut env, EpisodeMode::Learn, episode, &mut []).unwrap();
            assert!(report.steps >= 1);
            assert_eq!(report.updates, report.steps);
            assert!(agent.trajectory().is_empty());
        }
    }

    #[test]
    fn test_evaluation_leaves_table_untouched() {
        let mut agent = Agent::new(AgentConfig::sarsa().with_seed(3)).unwrap();
        let mut env = Environment::new(Rewards::default()).with_seed(4);
        agent.enter_evaluation_mode(Some(0.5)).unwrap();
        for episode in 0..50 {
            let report =
                play_episode(&mut agent, &mut env, EpisodeMode::Evaluate, episode, &mut [])
                    .unwrap();
            assert_eq!(report.updates, 0);
        }
        assert!(agent.value_table().is_empty());
    }
}
