use crate::Value;
use std::borrow::Borrow;
use std::collections::BTreeMap;

mod get;
mod get_mut;
mod insert;
mod remove;

pub use self::get::get;
pub use self::get_mut::get_mut;
pub use self::insert::insert;
pub use self::remove::remove;

pub trait ValueCollection {
    type Key: Borrow<Self::BorrowedKey>;
    type BorrowedKey: ?Sized;

    fn get_value(&self, key: &Self::BorrowedKey) -> Option<&Value>;
    fn get_mut_value(&mut self, key: &Self::BorrowedKey) -> Option<&mut Value>;
    fn insert_value(&mut self, key: Self::Key, value: Value) -> Option<Value>;
    fn remove_value(&mut self, key: &Self::BorrowedKey) -> Option<Value>;
    fn is_empty_collection(&self) -> bool;
}

impl ValueCollection for Value {
    type Key = ();
    type BorrowedKey = ();

    fn get_value(&self, key: &()) -> Option<&Self> {
        Some(self)
    }

    fn get_mut_value(&mut self, key: &()) -> Option<&mut Self> {
        Some(self)
    }

    fn insert_value(&mut self, key: (), value: Self) -> Option<Self> {
        Some(std::mem::replace(self, value))
    }

    fn remove_value(&mut self, key: &()) -> Option<Self> {
        match self {
            Self::Object(map) => return Some(Self::Object(std::mem::take(map))),
            Self::Array(array) => return Some(Self::Array(std::mem::take(array))),
            _ => {}
        }
        // removing non-collection types replaces it with null
        Some(std::mem::replace(self, Self::Null))
    }

    fn is_empty_collection(&self) -> bool {
        false
    }
}

impl ValueCollection for BTreeMap<String, Value> {
    type Key = String;
    type BorrowedKey = str;

    fn get_value(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn get_mut_value(&mut self, key: &str) -> Option<&mut Value> {
        self.get_mut(key)
    }

    fn insert_value(&mut self, key: String, value: Value) -> Option<Value> {
        self.insert(key, value)
    }

    fn remove_value(&mut self, key: &str) -> Option<Value> {
        self.remove(key)
    }

    fn is_empty_collection(&self) -> bool {
        self.is_empty()
    }
}

fn array_index(array: &[Value], index: isize) -> usize {
    if index >= 0 {
        index as usize
    } else {
        (array.len() as isize + index) as usize
    }
}

impl ValueCollection for Vec<Value> {
    type Key = isize;
    type BorrowedKey = isize;

    fn get_value(&self, key: &Self::Key) -> Option<&Value> {
        self.get(array_index(self, *key))
    }

    fn get_mut_value(&mut self, key: &isize) -> Option<&mut Value> {
        let index = array_index(self, *key);
        self.get_mut(index)
    }

    fn insert_value(&mut self, key: isize, value: Value) -> Option<Value> {
        if key >= 0 {
            if self.len() <= (key as usize) {
                while self.len() <= (key as usize) {
                    self.push(Value::Null);
                }
                self[key as usize] = value;
                None
            } else {
                Some(std::mem::replace(&mut self[key as usize], value))
            }
        } else {
            let len_required = -key as usize;
            if self.len() < len_required {
                while self.len() < (len_required - 1) {
                    self.insert(0, Value::Null);
                }
                self.insert(0, value);
                None
            } else {
                let index = (self.len() as isize + key) as usize;
                Some(std::mem::replace(&mut self[index], value))
            }
        }
    }

    fn remove_value(&mut self, key: &isize) -> Option<Value> {
        let index = array_index(self, *key);
        if index < self.len() {
            Some(self.remove(index))
        } else {
            None
        }
    }

    fn is_empty_collection(&self) -> bool {
        self.is_empty()
    }
}
