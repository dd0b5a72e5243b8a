/*!

This is the long-form manual for `works_council` and `wcseats`.

## What is computed

Given the head count of a workplace by gender, and the candidate lists with
their votes, the program computes:

* the size of the works council, from the statutory table of seats by number
  of employees (BetrVG §9). Above 9000 employees, two seats are added for every
  started block of 3000 employees.
* the seats of each list, with the D'Hondt method over the list votes.
* the gender quota of the council: the D'Hondt split of the seats between the
  men and the women of the workplace (BetrVG §15). Non-binary workers are
  counted in the head count, but not in the quota.
* which candidates are elected on each list.

## Election on a list

Lists are processed from the most voted to the least voted. Two lists with the
same number of votes are processed in the order of the input.

* The first candidates of a list, up to the number of seats the list won, are
  *popularly elected*.
* If a list won more seats than it has candidates, the extra seats go to the
  next lists that still have candidates, in processing order. These candidates
  are *overflow elected*. A list without any vote never receives extra seats.
* When the council has more than 3 seats, the gender with fewer workers is the
  minority gender (women when there are as many men as women). The seats of
  each list are split between men and women like the seats of the council. If
  a list elects fewer members of the minority gender than its share, its
  lowest ranked winners give their seats back. These seats go to the next
  candidates of the minority gender, first on the same list, then on the next
  lists. These candidates are *gender quota elected*.

The same input always gives the same result.

## Input format

`wcseats` reads a JSON description of the election:

```text
{
  "outputSettings": { "contestName": "Works council 2026", "contestDate": "2026-03-01" },
  "workforce": { "men": 30, "women": 20, "nonBinary": 0 },
  "lists": [
    {
      "id": "BR",
      "name": "Brolidarity",
      "votes": 5,
      "members": [
        { "id": "BR.1", "gender": "man" },
        { "id": "BR.2", "gender": "man" }
      ]
    }
  ]
}
```

The genders are `man`, `woman` and `nonbinary` (`divers` is accepted for
`nonbinary`). All the counts must be non-negative. The order of the members
in a list is their rank.

## Output format

The summary is a JSON document with the `config` of the contest and the
`results`: the size of the council, the minority gender, the gender quota of
the workplace and whether it is achieved, the seats of each list, and for
each list the elected candidates by the way they were elected.

See the `demos` directory for complete examples.

 */
