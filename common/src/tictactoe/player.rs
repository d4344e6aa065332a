use crate::tictactoe::board::Mark;
use std::ops::{Index, IndexMut};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlayerNum {
    #[default]
    P1,
    P2,
}

impl PlayerNum {
    pub fn index(&self) -> usize {
        match self {
            PlayerNum::P1 => 0,
            PlayerNum::P2 => 1,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Player {
    pub id: Option<i64>,
    // Defaults to the id, empty until the player has joined
    pub name: String,
    pub token: Option<Mark>,
}

impl Player {
    pub fn with_id(id: i64) -> Self {
        Player {
            id: Some(id),
            name: id.to_string(),
            token: None,
        }
    }

    pub fn is_seated(&self) -> bool {
        !self.name.is_empty()
    }
}

// Slot order is join order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Players([Player; 2]);

impl Players {
    pub fn iter(&self) -> impl Iterator<Item = (PlayerNum, &Player)> {
        [PlayerNum::P1, PlayerNum::P2]
            .into_iter()
            .zip(self.0.iter())
    }

    pub fn first_free_slot(&self) -> Option<PlayerNum> {
        self.iter()
            .find(|(_, player)| !player.is_seated())
            .map(|(num, _)| num)
    }
}

impl Index<PlayerNum> for Players {
    type Output = Player;
    fn index(&self, index: PlayerNum) -> &Self::Output {
        &self.0[index.index()]
    }
}

impl IndexMut<PlayerNum> for Players {
    fn index_mut(&mut self, index: PlayerNum) -> &mut Self::Output {
        &mut self.0[index.index()]
    }
}
