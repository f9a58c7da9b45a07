use crate::tensor::Tensor;
use std::fmt;

impl Tensor {
    pub fn print(&self) {
        println!("{self}");
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.data.outer_iter().enumerate() {
            if i > 0 {
                write!(f, ",\n ")?;
            }
            write!(f, "[")?;
            for (j, x) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{x:8.4}")?;
            }
            write!(f, "]")?;
        }
        writeln!(f, "]")?;
        writeln!(f, "形状: {:?}", self.shape())
    }
}
